use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::{PlayerId, SeatIndex};

/// Статус места в контексте стола/раздачи.
///
/// Внутри одной раздачи переходы только односторонние:
/// `Active -> Folded` или `Active -> AllIn`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SeatStatus {
    /// Место свободно.
    Empty,
    /// Игрок участвует в раздаче и может действовать.
    Active,
    /// Игрок сфолдил и больше не участвует в банке.
    Folded,
    /// Игрок в оллыне – не может больше делать ставки.
    AllIn,
    /// Игрок сидит за столом, но не участвует в раздачах.
    SittingOut,
}

/// Одно место за столом.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Seat {
    pub index: SeatIndex,
    /// Кто сидит (None – место пустое).
    pub occupant: Option<PlayerId>,
    /// Текущий стек за столом.
    pub stack: Chips,
    /// Карманные карты: 0 или ровно 2 после раздачи.
    pub hole_cards: Vec<Card>,
    pub status: SeatStatus,
    /// Вложено в текущем раунде ставок.
    pub committed_round: Chips,
    /// Вложено за всю раздачу.
    pub committed_hand: Chips,
    /// Игрок попросил пропускать следующие раздачи.
    pub sit_out_next: bool,
    /// Игрок встал посреди раздачи: место освобождается после выплаты.
    pub leaving: bool,
}

impl Seat {
    pub fn empty(index: SeatIndex) -> Self {
        Self {
            index,
            occupant: None,
            stack: Chips::ZERO,
            hole_cards: Vec::new(),
            status: SeatStatus::Empty,
            committed_round: Chips::ZERO,
            committed_hand: Chips::ZERO,
            sit_out_next: false,
            leaving: false,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Может ли сейчас действовать (не сфолдил, не в оллыне, сидит в раздаче).
    pub fn is_active(&self) -> bool {
        self.status == SeatStatus::Active
    }

    /// Ещё претендует на банк в текущей раздаче.
    pub fn is_contesting(&self) -> bool {
        matches!(self.status, SeatStatus::Active | SeatStatus::AllIn)
    }

    /// Готов сыграть следующую раздачу.
    pub fn is_ready_for_hand(&self) -> bool {
        self.is_occupied() && !self.stack.is_zero() && !self.sit_out_next && !self.leaving
    }
}
