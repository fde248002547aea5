use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::hand::Street;
use crate::domain::ledger::SeatLedger;
use crate::domain::seat::Seat;
use crate::domain::SeatIndex;
use crate::engine::positions::clockwise_from;

/// Состояние раунда ставок на одной улице.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BettingRound {
    pub street: Street,
    /// Ставка, до которой должны дотянуться игроки (BB, bet, raise).
    pub current_bet: Chips,
    /// Минимальный размер повышающей части рейза.
    pub min_raise: Chips,
    /// Кто ещё должен походить на этой улице, в порядке хода.
    pub to_act: Vec<SeatIndex>,
    /// Места, которым неполный олл-ин не переоткрыл торговлю: только call/fold.
    pub raise_locked: BTreeSet<SeatIndex>,
}

impl BettingRound {
    /// Открыть раунд. Очередь — все `Active` места по часовой начиная с `first`.
    pub fn start(
        street: Street,
        ledger: &SeatLedger,
        first: SeatIndex,
        current_bet: Chips,
        min_raise: Chips,
    ) -> Self {
        let mut round = Self {
            street,
            current_bet,
            min_raise,
            to_act: active_from(ledger, first, true),
            raise_locked: BTreeSet::new(),
        };
        round.close_if_unanswered(ledger);
        round
    }

    /// Раунд без очереди: пока блайнды не поставлены.
    pub fn closed(street: Street, min_raise: Chips) -> Self {
        Self {
            street,
            current_bet: Chips::ZERO,
            min_raise,
            to_act: Vec::new(),
            raise_locked: BTreeSet::new(),
        }
    }

    pub fn current_actor(&self) -> Option<SeatIndex> {
        self.to_act.first().copied()
    }

    pub fn is_complete(&self) -> bool {
        self.to_act.is_empty()
    }

    pub fn can_raise(&self, seat: SeatIndex) -> bool {
        !self.raise_locked.contains(&seat)
    }

    /// Fold / check / call: место просто выходит из очереди.
    pub fn on_passive(&mut self, seat: SeatIndex) {
        self.remove(seat);
    }

    /// Ставка выросла до `new_bet`. Вызывается после того, как фишки уже
    /// перенесены в ledger.
    ///
    /// Полный рейз (прирост не меньше `min_raise`) переоткрывает торговлю
    /// для всех. Неполный олл-ин заставляет остальных доплатить, но те,
    /// кто уже ходил, могут только уравнять или сбросить.
    pub fn on_raise(&mut self, seat: SeatIndex, new_bet: Chips, ledger: &SeatLedger) {
        let increment = new_bet.saturating_sub(self.current_bet);
        let full = increment >= self.min_raise;
        let waiting: BTreeSet<SeatIndex> = self.to_act.iter().copied().collect();

        let queue: Vec<SeatIndex> = active_from(ledger, seat, false)
            .into_iter()
            .filter(|s| *s != seat)
            .collect();

        if full {
            self.min_raise = increment;
            self.raise_locked.clear();
        } else {
            for s in &queue {
                if !waiting.contains(s) {
                    self.raise_locked.insert(*s);
                }
            }
        }

        self.current_bet = new_bet;
        self.to_act = queue;
    }

    /// Если ходить может одно место и оно поставило не меньше любого
    /// соперника в игре, отвечать ему некому: очередь пуста.
    pub fn close_if_unanswered(&mut self, ledger: &SeatLedger) {
        let [only] = self.to_act.as_slice() else {
            return;
        };
        let only = *only;
        if ledger.iter().any(|s| s.index != only && s.is_active()) {
            return;
        }
        let to_match = ledger
            .iter()
            .filter(|s| s.index != only && s.is_contesting())
            .map(|s| s.committed_round)
            .max()
            .unwrap_or(Chips::ZERO);
        let matched = ledger
            .seat(only)
            .map(|s| s.committed_round >= to_match)
            .unwrap_or(true);
        if matched {
            self.to_act.clear();
        }
    }

    /// Убрать место из очереди (сфолдило вне очереди, встало из-за стола).
    pub fn remove(&mut self, seat: SeatIndex) {
        self.to_act.retain(|s| *s != seat);
    }
}

fn active_from(ledger: &SeatLedger, start: SeatIndex, include_start: bool) -> Vec<SeatIndex> {
    clockwise_from(ledger.len(), start, include_start)
        .into_iter()
        .filter(|idx| ledger.seat(*idx).map(Seat::is_active).unwrap_or(false))
        .collect()
}
