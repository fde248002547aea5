//! Учёт мест и фишек игроков за одним столом.
//!
//! Ledger ничего не знает про очередь хода и банк: он только двигает фишки
//! между стеком и вкладом места и следит за статусами.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::seat::{Seat, SeatStatus};
use crate::domain::{PlayerId, SeatIndex};

/// Ошибки операций над местами.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("место {0} не существует за столом")]
    InvalidSeat(SeatIndex),

    #[error("место {0} уже занято")]
    SeatOccupied(SeatIndex),

    #[error("в месте {0} нет игрока")]
    EmptySeat(SeatIndex),

    #[error("игрок {0} уже сидит за столом")]
    PlayerAlreadySeated(PlayerId),

    #[error("недопустимый бай-ин {amount} (разрешено {min}..={max})")]
    InvalidBuyIn { amount: Chips, min: Chips, max: Chips },

    #[error("месту {seat} не хватает фишек: нужно {requested}, есть {available}")]
    InsufficientChips {
        seat: SeatIndex,
        requested: Chips,
        available: Chips,
    },

    #[error("место {seat}: переход {from:?} -> {to:?} запрещён")]
    InvalidTransition {
        seat: SeatIndex,
        from: SeatStatus,
        to: SeatStatus,
    },
}

/// Допустимый диапазон бай-ина.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuyInLimits {
    pub min: Chips,
    pub max: Chips,
}

/// Места стола: индекс вектора = SeatIndex.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatLedger {
    seats: Vec<Seat>,
}

impl SeatLedger {
    pub fn new(max_seats: u8) -> Self {
        Self {
            seats: (0..max_seats).map(Seat::empty).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Seat> {
        self.seats.iter()
    }

    pub fn seat(&self, index: SeatIndex) -> Result<&Seat, LedgerError> {
        self.seats
            .get(index as usize)
            .ok_or(LedgerError::InvalidSeat(index))
    }

    fn seat_mut(&mut self, index: SeatIndex) -> Result<&mut Seat, LedgerError> {
        self.seats
            .get_mut(index as usize)
            .ok_or(LedgerError::InvalidSeat(index))
    }

    fn occupied_mut(&mut self, index: SeatIndex) -> Result<&mut Seat, LedgerError> {
        let seat = self.seat_mut(index)?;
        if seat.is_occupied() {
            Ok(seat)
        } else {
            Err(LedgerError::EmptySeat(index))
        }
    }

    /// Место игрока, если он сидит за столом.
    pub fn seat_of(&self, player_id: PlayerId) -> Option<SeatIndex> {
        self.seats
            .iter()
            .find(|s| s.occupant == Some(player_id))
            .map(|s| s.index)
    }

    /// Посадить игрока. До начала следующей раздачи место ждёт в `SittingOut`.
    pub fn sit_down(
        &mut self,
        index: SeatIndex,
        player_id: PlayerId,
        buy_in: Chips,
        limits: BuyInLimits,
    ) -> Result<(), LedgerError> {
        if self.seat(index)?.is_occupied() {
            return Err(LedgerError::SeatOccupied(index));
        }
        if self.seat_of(player_id).is_some() {
            return Err(LedgerError::PlayerAlreadySeated(player_id));
        }
        if buy_in.is_zero() || buy_in < limits.min || buy_in > limits.max {
            return Err(LedgerError::InvalidBuyIn {
                amount: buy_in,
                min: limits.min,
                max: limits.max,
            });
        }

        let seat = self.seat_mut(index)?;
        *seat = Seat::empty(index);
        seat.occupant = Some(player_id);
        seat.stack = buy_in;
        seat.status = SeatStatus::SittingOut;
        Ok(())
    }

    /// Освободить место. Возвращает игрока и его стек (кэш-аут).
    pub fn stand_up(&mut self, index: SeatIndex) -> Result<(PlayerId, Chips), LedgerError> {
        let seat = self.occupied_mut(index)?;
        let player_id = seat.occupant.ok_or(LedgerError::EmptySeat(index))?;
        let stack = seat.stack;
        *seat = Seat::empty(index);
        Ok((player_id, stack))
    }

    /// Пометить место на уход после раздачи.
    pub fn mark_leaving(&mut self, index: SeatIndex) -> Result<(), LedgerError> {
        self.occupied_mut(index)?.leaving = true;
        Ok(())
    }

    pub fn set_sit_out_next(&mut self, index: SeatIndex, value: bool) -> Result<(), LedgerError> {
        self.occupied_mut(index)?.sit_out_next = value;
        Ok(())
    }

    /// Поставить блайнд: не больше стека, при нехватке — AllIn.
    /// Возвращает реально поставленную сумму.
    pub fn post_blind(&mut self, index: SeatIndex, amount: Chips) -> Result<Chips, LedgerError> {
        let seat = self.occupied_mut(index)?;
        let paid = amount.min(seat.stack);
        move_to_committed(seat, paid);
        Ok(paid)
    }

    /// Перенести `amount` из стека во вклад раунда.
    /// Вызывающий код обязан сам урезать сумму до оллына.
    pub fn commit(&mut self, index: SeatIndex, amount: Chips) -> Result<(), LedgerError> {
        let seat = self.occupied_mut(index)?;
        if amount > seat.stack {
            return Err(LedgerError::InsufficientChips {
                seat: index,
                requested: amount,
                available: seat.stack,
            });
        }
        if seat.status != SeatStatus::Active {
            return Err(LedgerError::InvalidTransition {
                seat: index,
                from: seat.status,
                to: SeatStatus::Active,
            });
        }
        move_to_committed(seat, amount);
        Ok(())
    }

    pub fn fold(&mut self, index: SeatIndex) -> Result<(), LedgerError> {
        let seat = self.occupied_mut(index)?;
        if seat.status != SeatStatus::Active {
            return Err(LedgerError::InvalidTransition {
                seat: index,
                from: seat.status,
                to: SeatStatus::Folded,
            });
        }
        seat.status = SeatStatus::Folded;
        Ok(())
    }

    /// Выплата из банка.
    pub fn award(&mut self, index: SeatIndex, amount: Chips) -> Result<(), LedgerError> {
        let seat = self.occupied_mut(index)?;
        seat.stack += amount;
        Ok(())
    }

    pub fn deal_hole_card(&mut self, index: SeatIndex, card: Card) -> Result<(), LedgerError> {
        self.occupied_mut(index)?.hole_cards.push(card);
        Ok(())
    }

    /// Подготовить места к новой раздаче. Возвращает места, которые в ней играют.
    pub fn begin_hand(&mut self) -> Vec<SeatIndex> {
        let mut participants = Vec::new();
        for seat in self.seats.iter_mut().filter(|s| s.is_occupied()) {
            seat.hole_cards.clear();
            seat.committed_round = Chips::ZERO;
            seat.committed_hand = Chips::ZERO;
            if seat.is_ready_for_hand() {
                seat.status = SeatStatus::Active;
                participants.push(seat.index);
            } else {
                seat.status = SeatStatus::SittingOut;
            }
        }
        participants
    }

    /// Закрыть раунд ставок: обнулить вклады раунда.
    pub fn end_round(&mut self) {
        for seat in self.seats.iter_mut() {
            seat.committed_round = Chips::ZERO;
        }
    }

    /// Банк разыгран: вклады раздачи больше ничего не значат.
    pub fn end_hand(&mut self) {
        for seat in self.seats.iter_mut() {
            seat.committed_round = Chips::ZERO;
            seat.committed_hand = Chips::ZERO;
        }
    }

    /// Сколько мест готово сыграть раздачу.
    pub fn ready_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_ready_for_hand()).count()
    }

    pub fn contesting_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_contesting()).count()
    }

    pub fn total_stacks(&self) -> Chips {
        self.seats.iter().map(|s| s.stack).sum()
    }

    pub fn total_committed_hand(&self) -> Chips {
        self.seats.iter().map(|s| s.committed_hand).sum()
    }
}

fn move_to_committed(seat: &mut Seat, amount: Chips) {
    seat.stack -= amount;
    seat.committed_round += amount;
    seat.committed_hand += amount;
    if seat.stack.is_zero() && seat.status == SeatStatus::Active {
        seat.status = SeatStatus::AllIn;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMITS: BuyInLimits = BuyInLimits {
        min: Chips(10),
        max: Chips(1_000),
    };

    fn ledger_with(stacks: &[u64]) -> SeatLedger {
        let mut ledger = SeatLedger::new(6);
        for (i, s) in stacks.iter().enumerate() {
            ledger
                .sit_down(i as SeatIndex, 100 + i as PlayerId, Chips(*s), LIMITS)
                .unwrap();
        }
        ledger.begin_hand();
        ledger
    }

    #[test]
    fn sit_down_validates_seat_and_buy_in() {
        let mut ledger = SeatLedger::new(2);
        assert_eq!(
            ledger.sit_down(5, 1, Chips(100), LIMITS),
            Err(LedgerError::InvalidSeat(5))
        );
        assert!(matches!(
            ledger.sit_down(0, 1, Chips(5), LIMITS),
            Err(LedgerError::InvalidBuyIn { .. })
        ));
        ledger.sit_down(0, 1, Chips(100), LIMITS).unwrap();
        assert_eq!(
            ledger.sit_down(0, 2, Chips(100), LIMITS),
            Err(LedgerError::SeatOccupied(0))
        );
        assert_eq!(
            ledger.sit_down(1, 1, Chips(100), LIMITS),
            Err(LedgerError::PlayerAlreadySeated(1))
        );
    }

    #[test]
    fn post_blind_caps_at_stack_and_goes_all_in() {
        let mut ledger = ledger_with(&[15, 100]);
        assert_eq!(ledger.post_blind(0, Chips(20)).unwrap(), Chips(15));
        let seat = ledger.seat(0).unwrap();
        assert_eq!(seat.status, SeatStatus::AllIn);
        assert_eq!(seat.committed_round, Chips(15));
        assert_eq!(seat.committed_hand, Chips(15));
        assert!(seat.stack.is_zero());
    }

    #[test]
    fn commit_refuses_more_than_stack() {
        let mut ledger = ledger_with(&[50, 100]);
        assert_eq!(
            ledger.commit(0, Chips(60)),
            Err(LedgerError::InsufficientChips {
                seat: 0,
                requested: Chips(60),
                available: Chips(50),
            })
        );
        ledger.commit(0, Chips(50)).unwrap();
        assert_eq!(ledger.seat(0).unwrap().status, SeatStatus::AllIn);
    }

    #[test]
    fn statuses_only_move_forward_within_a_hand() {
        let mut ledger = ledger_with(&[50, 100]);
        ledger.fold(1).unwrap();
        assert!(matches!(ledger.fold(1), Err(LedgerError::InvalidTransition { .. })));
        assert!(matches!(ledger.commit(1, Chips(1)), Err(LedgerError::InvalidTransition { .. })));

        // Новая раздача: снова Active.
        let participants = ledger.begin_hand();
        assert_eq!(participants, vec![0, 1]);
        assert_eq!(ledger.seat(1).unwrap().status, SeatStatus::Active);
    }

    #[test]
    fn begin_hand_skips_broke_and_sitting_out_seats() {
        let mut ledger = ledger_with(&[50, 100, 70]);
        ledger.commit(0, Chips(50)).unwrap();
        ledger.set_sit_out_next(2, true).unwrap();
        let participants = ledger.begin_hand();
        assert_eq!(participants, vec![1]);
        assert_eq!(ledger.seat(0).unwrap().status, SeatStatus::SittingOut);
        assert_eq!(ledger.seat(2).unwrap().status, SeatStatus::SittingOut);
    }

    #[test]
    fn stand_up_returns_stack() {
        let mut ledger = ledger_with(&[50, 100]);
        assert_eq!(ledger.stand_up(1).unwrap(), (101, Chips(100)));
        assert_eq!(ledger.stand_up(1), Err(LedgerError::EmptySeat(1)));
        assert_eq!(ledger.seat(1).unwrap().status, SeatStatus::Empty);
    }
}
