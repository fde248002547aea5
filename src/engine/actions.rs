use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::SeatIndex;

/// Тип действия игрока.
///
/// Суммы у `Bet`/`Raise` — итоговая ставка игрока в раунде («до скольких»),
/// а не добавка к уже поставленному.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlayerActionKind {
    Fold,
    Check,
    Call,
    /// Bet на улице, где ещё нет ставки.
    Bet(Chips),
    /// Raise существующей ставки.
    Raise(Chips),
    /// All-in – поставить весь стек.
    AllIn,
}

/// Намерение игрока, пришедшее от транспорта.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerIntent {
    /// В каком месте сидит игрок (0..max_seats-1).
    pub seat: SeatIndex,
    pub action: PlayerActionKind,
}

impl PlayerIntent {
    pub fn new(seat: SeatIndex, action: PlayerActionKind) -> Self {
        Self { seat, action }
    }
}
