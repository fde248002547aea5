//! Машина состояний стола.
//!
//! `TableEngine` владеет столом, колодой, банком и раундом ставок.
//! Каждая публичная операция атомарна: либо отклоняется без изменений,
//! либо применяется целиком и возвращает события для рассылки.
//! После каждой операции проверяется сохранение фишек; нарушение
//! инварианта останавливает стол.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::api::commands::TableCommand;
use crate::api::dto::{ActionRequest, HandResult, SeatView, TableSnapshot};
use crate::api::events::TableEvent;
use crate::domain::chips::Chips;
use crate::domain::deck::{Deck, DeckOrderError};
use crate::domain::hand::{DealStage, Phase, Street};
use crate::domain::ledger::{LedgerError, SeatLedger};
use crate::domain::seat::{Seat, SeatStatus};
use crate::domain::table::{Table, TableConfig};
use crate::domain::{HandId, PlayerId, SeatIndex, TableId};
use crate::engine::actions::{PlayerActionKind, PlayerIntent};
use crate::engine::betting::BettingRound;
use crate::engine::errors::EngineError;
use crate::engine::hand_history::HandHistory;
use crate::engine::positions::{
    blind_seats, choose_button, clockwise_from, next_seat_matching, payout_order,
};
use crate::engine::pot::{distribute, PotAccountant, PotAward};
use crate::engine::validation::{legal_actions, resolve_action, LegalAction, ResolvedAction};
use crate::engine::RandomSource;
use crate::eval::{describe_hand, evaluate_best_hand, HandValue};

/// Сколько раздач подряд может стартовать сама в рамках одной операции.
/// Раздачи без единого решения (все в олл-ине на блайндах) иначе крутились бы бесконечно.
const AUTO_START_CHAIN_LIMIT: u32 = 16;

/// Карт нужно на раздачу: по две на место, пять на борд и три в бёрн.
fn cards_needed(participants: usize) -> usize {
    participants * 2 + 5 + 3
}

/// Состояние текущей (или последней сыгранной) раздачи.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandState {
    pub hand_id: HandId,
    pub deck: Deck,
    pub pot: PotAccountant,
    pub betting: BettingRound,
    pub history: HandHistory,
}

/// Кто должен ходить и номер этого хода (для таймера).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingAction {
    pub seat: SeatIndex,
    pub player_id: PlayerId,
    pub turn_seq: u64,
}

pub struct TableEngine<R: RandomSource> {
    table: Table,
    hand: Option<HandState>,
    rng: R,
    /// Σ стеков + банк. Меняется только бай-ином и кэш-аутом.
    chips_on_table: Chips,
    next_hand_id: HandId,
    turn_seq: u64,
    snapshot_seq: u64,
    /// Места, чьи карты вскрыты на шоудауне последней раздачи.
    revealed: BTreeSet<SeatIndex>,
    start_pending: bool,
    halted: Option<String>,
    outbox: Vec<TableEvent>,
    last_history: Option<HandHistory>,
}

impl<R: RandomSource> TableEngine<R> {
    pub fn new(id: TableId, config: TableConfig, rng: R) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            table: Table::new(id, config),
            hand: None,
            rng,
            chips_on_table: Chips::ZERO,
            next_hand_id: 1,
            turn_seq: 0,
            snapshot_seq: 0,
            revealed: BTreeSet::new(),
            start_pending: false,
            halted: None,
            outbox: Vec::new(),
            last_history: None,
        })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn table_id(&self) -> TableId {
        self.table.id
    }

    /// Все фишки, которые сейчас лежат на столе (стеки + банк).
    pub fn total_chips(&self) -> Chips {
        self.chips_on_table
    }

    pub fn is_halted(&self) -> bool {
        self.halted.is_some()
    }

    pub fn halt_reason(&self) -> Option<&str> {
        self.halted.as_deref()
    }

    /// История последней завершённой раздачи.
    pub fn last_hand_history(&self) -> Option<&HandHistory> {
        self.last_history.as_ref()
    }

    // ---------- команды ----------

    pub fn execute(&mut self, command: TableCommand) -> Result<Vec<TableEvent>, EngineError> {
        match command {
            TableCommand::SitDown {
                seat,
                player_id,
                buy_in,
            } => self.sit_down(seat, player_id, buy_in),
            TableCommand::StandUp { seat } => self.stand_up(seat),
            TableCommand::SitOut { seat } => self.sit_out(seat),
            TableCommand::SitIn { seat } => self.sit_in(seat),
            TableCommand::Intent(intent) => self.apply_intent(intent),
            TableCommand::StartHand => self.start_hand(),
        }
    }

    pub fn sit_down(
        &mut self,
        seat: SeatIndex,
        player_id: PlayerId,
        buy_in: Chips,
    ) -> Result<Vec<TableEvent>, EngineError> {
        self.run(|e| {
            let limits = e.table.config.buy_in_limits();
            e.table.seats.sit_down(seat, player_id, buy_in, limits)?;
            e.chips_on_table += buy_in;
            info!(table_id = e.table.id, seat, player_id, %buy_in, "игрок сел за стол");
            e.emit(TableEvent::SeatTaken {
                seat,
                player_id,
                buy_in,
            });
            e.request_auto_start();
            Ok(())
        })
    }

    /// Встать из-за стола. Посреди раздачи активное место сбрасывает карты,
    /// а само место освобождается после выплаты.
    pub fn stand_up(&mut self, seat: SeatIndex) -> Result<Vec<TableEvent>, EngineError> {
        self.run(|e| e.leave_seat(seat))
    }

    pub fn sit_out(&mut self, seat: SeatIndex) -> Result<Vec<TableEvent>, EngineError> {
        self.run(|e| {
            e.table.seats.set_sit_out_next(seat, true)?;
            debug!(table_id = e.table.id, seat, "место пропускает следующие раздачи");
            Ok(())
        })
    }

    pub fn sit_in(&mut self, seat: SeatIndex) -> Result<Vec<TableEvent>, EngineError> {
        self.run(|e| {
            e.table.seats.set_sit_out_next(seat, false)?;
            debug!(table_id = e.table.id, seat, "место вернулось в игру");
            e.request_auto_start();
            Ok(())
        })
    }

    pub fn start_hand(&mut self) -> Result<Vec<TableEvent>, EngineError> {
        self.run(|e| e.begin_hand(None))
    }

    /// Сыграть раздачу на заданной колоде (повтор, тесты).
    pub fn start_hand_with_deck(&mut self, deck: Deck) -> Result<Vec<TableEvent>, EngineError> {
        self.run(move |e| e.begin_hand(Some(deck)))
    }

    pub fn apply_intent(&mut self, intent: PlayerIntent) -> Result<Vec<TableEvent>, EngineError> {
        self.run(|e| e.act(intent, false))
    }

    /// Время хода вышло: check, если он легален, иначе fold.
    /// Таймаут для уже сделанного хода отклоняется как `StaleTimeout`.
    pub fn apply_timeout(
        &mut self,
        seat: SeatIndex,
        turn_seq: u64,
    ) -> Result<Vec<TableEvent>, EngineError> {
        self.run(|e| {
            let pending = e.pending_action().ok_or(EngineError::StaleTimeout)?;
            if pending.seat != seat || pending.turn_seq != turn_seq {
                return Err(EngineError::StaleTimeout);
            }
            let committed = e.table.seats.seat(seat)?.committed_round;
            let action = if committed >= e.hand_ref()?.betting.current_bet {
                PlayerActionKind::Check
            } else {
                PlayerActionKind::Fold
            };
            warn!(table_id = e.table.id, seat, ?action, "время хода истекло");
            e.act(PlayerIntent::new(seat, action), true)
        })
    }

    // ---------- запросы ----------

    pub fn pending_action(&self) -> Option<PendingAction> {
        if !matches!(self.table.phase, Phase::Betting(_)) || self.halted.is_some() {
            return None;
        }
        let seat = self.hand.as_ref()?.betting.current_actor()?;
        let player_id = self.table.seats.seat(seat).ok()?.occupant?;
        Some(PendingAction {
            seat,
            player_id,
            turn_seq: self.turn_seq,
        })
    }

    pub fn action_request(&self) -> Option<ActionRequest> {
        let pending = self.pending_action()?;
        self.build_action_request(pending.seat).ok()
    }

    /// Легальные действия места; пусто, если сейчас не его ход.
    pub fn legal_actions(&self, seat: SeatIndex) -> Vec<LegalAction> {
        match (self.pending_action(), self.hand.as_ref(), self.table.seats.seat(seat)) {
            (Some(pending), Some(hand), Ok(s)) if pending.seat == seat => legal_actions(
                s,
                &hand.betting,
                opponents_can_act(&self.table.seats, seat),
            ),
            _ => Vec::new(),
        }
    }

    /// Публичный снимок: видны только вскрытые карты.
    pub fn snapshot(&self) -> TableSnapshot {
        self.build_snapshot(None)
    }

    /// Снимок глазами игрока: плюс его собственные карты.
    pub fn snapshot_for(&self, viewer: PlayerId) -> TableSnapshot {
        self.build_snapshot(Some(viewer))
    }

    // ---------- обёртка операций ----------

    fn run<F>(&mut self, op: F) -> Result<Vec<TableEvent>, EngineError>
    where
        F: FnOnce(&mut Self) -> Result<(), EngineError>,
    {
        if let Some(reason) = &self.halted {
            return Err(EngineError::TableHalted(reason.clone()));
        }
        self.outbox.clear();
        self.start_pending = false;

        let mut result = op(self);
        if result.is_ok() {
            result = self.run_auto_start();
        }
        if result.is_ok() {
            result = self.check_conservation();
        }

        match result {
            Ok(()) => {
                if !matches!(
                    self.outbox.last(),
                    Some(TableEvent::Snapshot(_)) | Some(TableEvent::ActionRequired(_))
                ) {
                    self.emit_snapshot();
                }
                Ok(std::mem::take(&mut self.outbox))
            }
            Err(err) => {
                self.outbox.clear();
                if err.is_fatal() {
                    self.halt(&err);
                } else {
                    debug!(table_id = self.table.id, %err, "операция отклонена");
                }
                Err(err)
            }
        }
    }

    fn halt(&mut self, err: &EngineError) {
        error!(
            table_id = self.table.id,
            hand_id = ?self.table.hand_id,
            %err,
            "нарушен инвариант, стол остановлен"
        );
        self.halted = Some(err.to_string());
    }

    fn run_auto_start(&mut self) -> Result<(), EngineError> {
        let mut chained = 0;
        while std::mem::take(&mut self.start_pending) {
            if chained == AUTO_START_CHAIN_LIMIT {
                warn!(table_id = self.table.id, "слишком много раздач подряд без решений, ждём команды");
                break;
            }
            chained += 1;
            self.begin_hand(None)?;
        }
        Ok(())
    }

    fn request_auto_start(&mut self) {
        if !self.table.phase.is_hand_running()
            && self.table.config.auto_start
            && self.table.seats.ready_count() >= 2
        {
            self.start_pending = true;
        }
    }

    fn check_conservation(&self) -> Result<(), EngineError> {
        let pot = self.hand.as_ref().map(|h| h.pot.total()).unwrap_or(Chips::ZERO);
        let actual = self.table.seats.total_stacks() + pot;
        if actual != self.chips_on_table {
            return Err(EngineError::ChipConservation {
                expected: self.chips_on_table,
                actual,
            });
        }
        if pot != self.table.seats.total_committed_hand() {
            return Err(EngineError::Internal("вклады мест расходятся с банком"));
        }
        Ok(())
    }

    // ---------- события ----------

    fn emit(&mut self, event: TableEvent) {
        if self.table.phase.is_hand_running() {
            if let Some(hand) = self.hand.as_mut() {
                hand.history.push(&event);
            }
        }
        self.outbox.push(event);
    }

    fn emit_snapshot(&mut self) {
        self.snapshot_seq += 1;
        let snapshot = self.build_snapshot(None);
        self.outbox.push(TableEvent::Snapshot(snapshot));
    }

    fn set_phase(&mut self, phase: Phase) {
        self.table.phase = phase;
        self.emit_snapshot();
    }

    fn hand_ref(&self) -> Result<&HandState, EngineError> {
        self.hand
            .as_ref()
            .ok_or(EngineError::Internal("нет состояния раздачи"))
    }

    fn hand_mut(&mut self) -> Result<&mut HandState, EngineError> {
        self.hand
            .as_mut()
            .ok_or(EngineError::Internal("нет состояния раздачи"))
    }

    fn button(&self) -> Result<SeatIndex, EngineError> {
        self.table
            .dealer_button
            .ok_or(EngineError::Internal("кнопка дилера не назначена"))
    }

    // ---------- раздача ----------

    fn begin_hand(&mut self, deck: Option<Deck>) -> Result<(), EngineError> {
        if self.table.phase.is_hand_running() {
            return Err(EngineError::HandInProgress);
        }
        let ready = self.table.seats.ready_count();
        if ready < 2 {
            return Err(EngineError::NotEnoughPlayers);
        }
        let deck = match deck {
            Some(deck) if deck.remaining() < cards_needed(ready) => {
                return Err(DeckOrderError::WrongSize(deck.remaining()).into());
            }
            Some(deck) => deck,
            None => {
                let mut deck = Deck::standard_52();
                deck.reset(&mut self.rng);
                deck
            }
        };

        let hand_id = self.next_hand_id;
        self.next_hand_id += 1;
        let stakes = self.table.config.stakes;

        self.table.board.clear();
        self.table.hand_id = Some(hand_id);
        self.revealed.clear();
        let participants = self.table.seats.begin_hand();
        let button = choose_button(&self.table.seats, self.table.dealer_button)
            .ok_or(EngineError::NotEnoughPlayers)?;
        self.table.dealer_button = Some(button);
        self.hand = Some(HandState {
            hand_id,
            deck,
            pot: PotAccountant::new(),
            betting: BettingRound::closed(Street::PreFlop, stakes.big_blind),
            history: HandHistory::new(self.table.id, hand_id),
        });
        self.set_phase(Phase::Dealing(DealStage::HoleCards));

        let (sb, bb) = blind_seats(&self.table.seats, button, participants.len())?;
        let sb_paid = self.post_blind(sb, stakes.small_blind)?;
        let bb_paid = self.post_blind(bb, stakes.big_blind)?;
        info!(
            table_id = self.table.id,
            hand_id,
            button,
            players = participants.len(),
            "раздача началась"
        );
        self.emit(TableEvent::HandStarted {
            hand_id,
            dealer_button: button,
            small_blind: (sb, sb_paid),
            big_blind: (bb, bb_paid),
        });

        // По одной карте за проход, начиная слева от кнопки.
        let order: Vec<SeatIndex> = clockwise_from(self.table.seats.len(), button, false)
            .into_iter()
            .filter(|s| participants.contains(s))
            .collect();
        for _ in 0..2 {
            for &seat in &order {
                let card = self.hand_mut()?.deck.deal()?;
                self.table.seats.deal_hole_card(seat, card)?;
            }
        }
        for &seat in &order {
            let s = self.table.seats.seat(seat)?;
            if let Some(player_id) = s.occupant {
                let cards = s.hole_cards.clone();
                self.emit(TableEvent::HoleCards {
                    seat,
                    player_id,
                    cards,
                });
            }
        }

        // Короткий олл-ин на BB не уменьшает колл: доплачивать до полного BB.
        let first = next_seat_matching(&self.table.seats, bb, Seat::is_active).unwrap_or(bb);
        let round = BettingRound::start(
            Street::PreFlop,
            &self.table.seats,
            first,
            stakes.big_blind.max(sb_paid),
            stakes.big_blind,
        );
        self.hand_mut()?.betting = round;
        self.set_phase(Phase::Betting(Street::PreFlop));
        self.progress()
    }

    fn post_blind(&mut self, seat: SeatIndex, amount: Chips) -> Result<Chips, EngineError> {
        let paid = self.table.seats.post_blind(seat, amount)?;
        self.hand_mut()?.pot.add(seat, paid);
        Ok(paid)
    }

    fn act(&mut self, intent: PlayerIntent, timed_out: bool) -> Result<(), EngineError> {
        if !matches!(self.table.phase, Phase::Betting(_)) {
            return Err(EngineError::NoActiveHand);
        }
        let hand = self
            .hand
            .as_mut()
            .ok_or(EngineError::Internal("нет состояния раздачи"))?;
        let actor = hand
            .betting
            .current_actor()
            .ok_or(EngineError::NoEligibleActor)?;
        if intent.seat != actor {
            return Err(EngineError::NotPlayersTurn(intent.seat));
        }

        let seats = &mut self.table.seats;
        let opponents = opponents_can_act(seats, actor);
        let seat = seats.seat(actor)?;
        let player_id = seat.occupant.ok_or(EngineError::NoEligibleActor)?;
        let resolved = resolve_action(seat, intent.action, &hand.betting, opponents)?;

        let mut added = Chips::ZERO;
        match resolved {
            ResolvedAction::Fold => {
                seats.fold(actor)?;
                hand.betting.on_passive(actor);
            }
            ResolvedAction::Check => hand.betting.on_passive(actor),
            ResolvedAction::Commit { add, to } => {
                seats.commit(actor, add)?;
                hand.pot.add(actor, add);
                added = add;
                if to > hand.betting.current_bet {
                    hand.betting.on_raise(actor, to, seats);
                } else {
                    hand.betting.on_passive(actor);
                }
            }
        }
        let stack_after = seats.seat(actor)?.stack;

        debug!(
            table_id = self.table.id,
            hand_id = hand.hand_id,
            seat = actor,
            action = ?intent.action,
            %added,
            timed_out,
            "ход принят"
        );
        self.emit(TableEvent::ActionTaken {
            seat: actor,
            player_id,
            action: intent.action,
            added,
            stack_after,
            timed_out,
        });
        self.progress()
    }

    /// Двигать раздачу, пока кто-то не должен ходить или раздача не кончится.
    fn progress(&mut self) -> Result<(), EngineError> {
        loop {
            let Phase::Betting(street) = self.table.phase else {
                return Ok(());
            };
            if self.table.seats.contesting_count() <= 1 {
                return self.award_uncontested();
            }
            if let Some(hand) = self.hand.as_mut() {
                hand.betting.close_if_unanswered(&self.table.seats);
            }
            if let Some(seat) = self.hand_ref()?.betting.current_actor() {
                return self.request_action(seat);
            }
            self.table.seats.end_round();
            match street.next() {
                Some(next) => self.deal_street(next)?,
                None => return self.showdown(),
            }
        }
    }

    fn request_action(&mut self, seat: SeatIndex) -> Result<(), EngineError> {
        self.turn_seq += 1;
        let request = self.build_action_request(seat)?;
        self.emit_snapshot();
        self.emit(TableEvent::ActionRequired(request));
        Ok(())
    }

    fn build_action_request(&self, seat: SeatIndex) -> Result<ActionRequest, EngineError> {
        let hand = self.hand_ref()?;
        let s = self.table.seats.seat(seat)?;
        let player_id = s.occupant.ok_or(EngineError::NoEligibleActor)?;
        Ok(ActionRequest {
            seat,
            player_id,
            turn_seq: self.turn_seq,
            legal_actions: legal_actions(
                s,
                &hand.betting,
                opponents_can_act(&self.table.seats, seat),
            ),
            to_call: hand.betting.current_bet.saturating_sub(s.committed_round),
            deadline_unix_ms: None,
            time_bank_secs: 0,
        })
    }

    /// Бёрн, открыть карты улицы и начать торговлю на ней.
    /// Если ходить могут меньше двух мест, очередь пуста и `progress`
    /// сразу сдаёт следующую улицу.
    fn deal_street(&mut self, street: Street) -> Result<(), EngineError> {
        self.set_phase(Phase::Dealing(street.into()));

        let hand = self.hand_mut()?;
        hand.deck.burn()?;
        let mut cards = Vec::with_capacity(street.board_cards());
        for _ in 0..street.board_cards() {
            cards.push(hand.deck.deal()?);
        }
        let hand_id = hand.hand_id;
        self.table.board.extend_from_slice(&cards);
        debug!(table_id = self.table.id, hand_id, ?street, "открыты карты улицы");
        self.emit(TableEvent::BoardDealt { street, cards });

        let button = self.button()?;
        let first =
            next_seat_matching(&self.table.seats, button, Seat::is_active).unwrap_or(button);
        let round = BettingRound::start(
            street,
            &self.table.seats,
            first,
            Chips::ZERO,
            self.table.config.stakes.big_blind,
        );
        self.hand_mut()?.betting = round;
        self.set_phase(Phase::Betting(street));
        Ok(())
    }

    fn showdown(&mut self) -> Result<(), EngineError> {
        self.set_phase(Phase::Showdown);

        let order = payout_order(self.table.seats.len(), self.button()?);
        let mut values: BTreeMap<SeatIndex, HandValue> = BTreeMap::new();
        let mut reveals = Vec::new();
        for idx in order {
            let seat = self.table.seats.seat(idx)?;
            if !seat.is_contesting() {
                continue;
            }
            let player_id = seat.occupant.ok_or(EngineError::Internal("претендент без игрока"))?;
            let hand = evaluate_best_hand(&seat.hole_cards, &self.table.board)?;
            values.insert(idx, hand);
            reveals.push(TableEvent::ShowdownReveal {
                seat: idx,
                player_id,
                cards: seat.hole_cards.clone(),
                hand,
            });
        }
        self.revealed.extend(values.keys().copied());
        for event in reveals {
            self.emit(event);
        }

        self.set_phase(Phase::Payout);
        let contenders = contesting_seats(&self.table.seats);
        let pots = self.hand_ref()?.pot.compute_pots(&contenders)?;
        let order = payout_order(self.table.seats.len(), self.button()?);
        let awards = distribute(&pots, &values, &order)?;
        self.settle(awards)
    }

    /// Остался один претендент: весь банк ему без вскрытия.
    fn award_uncontested(&mut self) -> Result<(), EngineError> {
        self.set_phase(Phase::Payout);
        let winner = self
            .table
            .seats
            .iter()
            .find(|s| s.is_contesting())
            .map(|s| s.index)
            .ok_or(EngineError::NoEligiblePlayers(0))?;
        let amount = self.hand_ref()?.pot.total();
        self.settle(vec![PotAward {
            pot_id: 0,
            amount,
            winners: vec![winner],
            shares: vec![(winner, amount)],
            winning_hand: None,
        }])
    }

    fn settle(&mut self, awards: Vec<PotAward>) -> Result<(), EngineError> {
        let hand_id = self.hand_ref()?.hand_id;
        for award in awards {
            for (seat, amount) in &award.shares {
                self.table.seats.award(*seat, *amount)?;
            }
            info!(
                table_id = self.table.id,
                hand_id,
                pot_id = award.pot_id,
                amount = %award.amount,
                winners = ?award.winners,
                "банк разыгран"
            );
            self.emit(TableEvent::HandResult(HandResult {
                hand_id,
                pot_id: award.pot_id,
                winning_seats: award.winners,
                amount: award.amount,
                payouts: award.shares,
                winning_hand: award.winning_hand,
                description: award.winning_hand.map(describe_hand),
            }));
        }
        self.hand_mut()?.pot.reset();
        self.table.seats.end_hand();
        self.after_payout(hand_id)
    }

    /// Освободить ушедших и проигравших стек, сдвинуть кнопку, решить,
    /// начинать ли следующую раздачу.
    fn after_payout(&mut self, hand_id: HandId) -> Result<(), EngineError> {
        let to_vacate: Vec<SeatIndex> = self
            .table
            .seats
            .iter()
            .filter(|s| s.is_occupied() && (s.leaving || s.stack.is_zero()))
            .map(|s| s.index)
            .collect();
        for seat in to_vacate {
            self.vacate(seat)?;
        }

        if let Some(button) = self.table.dealer_button {
            if let Some(next) = next_seat_matching(&self.table.seats, button, Seat::is_occupied) {
                self.table.dealer_button = Some(next);
            }
        }

        info!(table_id = self.table.id, hand_id, "раздача завершена");
        self.emit(TableEvent::HandFinished { hand_id });
        self.last_history = self.hand.as_ref().map(|h| h.history.clone());
        self.set_phase(Phase::Waiting);
        self.request_auto_start();
        Ok(())
    }

    fn vacate(&mut self, seat: SeatIndex) -> Result<(), EngineError> {
        let (player_id, cash_out) = self.table.seats.stand_up(seat)?;
        self.chips_on_table = self
            .chips_on_table
            .checked_sub(cash_out)
            .ok_or(EngineError::Internal("кэш-аут больше фишек на столе"))?;
        info!(table_id = self.table.id, seat, player_id, %cash_out, "место освобождено");
        self.emit(TableEvent::SeatVacated {
            seat,
            player_id,
            cash_out,
        });
        Ok(())
    }

    fn leave_seat(&mut self, idx: SeatIndex) -> Result<(), EngineError> {
        let seat = self.table.seats.seat(idx)?;
        if !seat.is_occupied() {
            return Err(LedgerError::EmptySeat(idx).into());
        }
        let in_hand = self.table.phase.is_hand_running()
            && matches!(
                seat.status,
                SeatStatus::Active | SeatStatus::AllIn | SeatStatus::Folded
            );
        if !in_hand {
            return self.vacate(idx);
        }

        let status = seat.status;
        let player_id = seat.occupant.ok_or(LedgerError::EmptySeat(idx))?;
        self.table.seats.mark_leaving(idx)?;
        if status != SeatStatus::Active {
            debug!(table_id = self.table.id, seat = idx, "место освободится после выплаты");
            return Ok(());
        }

        let hand = self
            .hand
            .as_mut()
            .ok_or(EngineError::Internal("нет состояния раздачи"))?;
        let was_actor = hand.betting.current_actor() == Some(idx);
        self.table.seats.fold(idx)?;
        hand.betting.remove(idx);
        let stack_after = self.table.seats.seat(idx)?.stack;
        self.emit(TableEvent::ActionTaken {
            seat: idx,
            player_id,
            action: PlayerActionKind::Fold,
            added: Chips::ZERO,
            stack_after,
            timed_out: false,
        });

        if was_actor || self.table.seats.contesting_count() <= 1 {
            self.progress()?;
        }
        Ok(())
    }

    // ---------- снимки ----------

    fn build_snapshot(&self, viewer: Option<PlayerId>) -> TableSnapshot {
        let betting = match (self.table.phase, self.hand.as_ref()) {
            (Phase::Betting(_), Some(hand)) => Some(&hand.betting),
            _ => None,
        };

        let seats = self
            .table
            .seats
            .iter()
            .map(|s| {
                let visible = self.revealed.contains(&s.index)
                    || (viewer.is_some() && s.occupant == viewer);
                SeatView {
                    seat: s.index,
                    player_id: s.occupant,
                    stack: s.stack,
                    status: s.status,
                    committed_round: s.committed_round,
                    committed_hand: s.committed_hand,
                    has_cards: !s.hole_cards.is_empty(),
                    hole_cards: (visible && !s.hole_cards.is_empty()).then(|| s.hole_cards.clone()),
                    sit_out_next: s.sit_out_next,
                    leaving: s.leaving,
                }
            })
            .collect();

        let pot_total = self.hand.as_ref().map(|h| h.pot.total()).unwrap_or(Chips::ZERO);
        let pots = match self.hand.as_ref() {
            Some(hand) if !pot_total.is_zero() => {
                match hand.pot.compute_pots(&contesting_seats(&self.table.seats)) {
                    Ok(pots) => pots,
                    Err(err) => {
                        error!(table_id = self.table.id, %err, "банк без претендентов в снимке");
                        Vec::new()
                    }
                }
            }
            _ => Vec::new(),
        };

        TableSnapshot {
            table_id: self.table.id,
            seq: self.snapshot_seq,
            hand_id: self.table.hand_id,
            phase: self.table.phase,
            dealer_button: self.table.dealer_button,
            stakes: self.table.config.stakes,
            board: self.table.board.clone(),
            seats,
            pots,
            pot_total,
            current_actor: self.pending_action().map(|p| p.seat),
            bet_to_match: betting.map(|b| b.current_bet).unwrap_or(Chips::ZERO),
            min_raise: betting
                .map(|b| b.min_raise)
                .unwrap_or(self.table.config.stakes.big_blind),
            halted: self.halted.clone(),
        }
    }
}

/// Есть ли кроме `seat` хоть одно место, которое может ответить на повышение.
fn opponents_can_act(seats: &SeatLedger, seat: SeatIndex) -> bool {
    seats.iter().any(|s| s.index != seat && s.is_active())
}

/// Места, ещё претендующие на банк.
fn contesting_seats(seats: &SeatLedger) -> BTreeSet<SeatIndex> {
    seats
        .iter()
        .filter(|s| s.is_contesting())
        .map(|s| s.index)
        .collect()
}
