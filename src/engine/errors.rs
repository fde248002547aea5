use crate::domain::deck::{DeckOrderError, EmptyDeckError};
use crate::domain::ledger::LedgerError;
use crate::domain::table::ConfigError;
use crate::domain::{Chips, SeatIndex};
use crate::engine::pot::PotId;
use crate::eval::EvalError;

use thiserror::Error;

/// Ошибки движка стола.
///
/// Две группы:
/// - ошибки валидации: намерение отклонено, состояние стола не изменилось;
/// - нарушения инвариантов (`is_fatal() == true`): стол останавливается
///   и дальше отвечает только `TableHalted`, пока его не пересоздадут снаружи.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    DeckOrder(#[from] DeckOrderError),

    #[error("недостаточно игроков для раздачи")]
    NotEnoughPlayers,

    #[error("раздача уже идёт")]
    HandInProgress,

    #[error("раздача не активна")]
    NoActiveHand,

    #[error("сейчас не ход места {0}")]
    NotPlayersTurn(SeatIndex),

    #[error("невозможно выполнить check – нужно хотя бы уравнять ставку {to_call}")]
    CannotCheck { to_call: Chips },

    #[error("невозможно выполнить call – нет ставки для уравнивания")]
    CannotCall,

    #[error("bet невозможен – ставка уже сделана, нужен raise")]
    CannotBet,

    #[error("raise невозможен – нет ставки, нужен bet")]
    NothingToRaise,

    #[error("повышение закрыто: неполный олл-ин не переоткрывает торговлю")]
    RaiseNotReopened,

    #[error("повышать некому: все соперники в олл-ине")]
    NoOpponentToRaise,

    #[error("ставка до {to} слишком мала, минимум {min}")]
    BetTooSmall { to: Chips, min: Chips },

    #[error("ставка до {to} больше доступного максимума {max}")]
    AmountExceedsStack { to: Chips, max: Chips },

    #[error("таймер хода устарел")]
    StaleTimeout,

    // ---- фатальные ----
    #[error("внутренняя ошибка: колода исчерпана")]
    EmptyDeck(#[from] EmptyDeckError),

    #[error("нарушен инвариант: у банка {0} нет претендентов")]
    NoEligiblePlayers(PotId),

    #[error("нарушен инвариант: некому ходить")]
    NoEligibleActor,

    #[error("нарушен инвариант фишек: ожидалось {expected}, на столе {actual}")]
    ChipConservation { expected: Chips, actual: Chips },

    #[error("внутренняя ошибка оценки руки: {0}")]
    Evaluation(#[from] EvalError),

    #[error("внутренняя ошибка: {0}")]
    Internal(&'static str),

    #[error("стол остановлен: {0}")]
    TableHalted(String),
}

impl EngineError {
    /// Нарушение инварианта: стол нельзя продолжать.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EngineError::EmptyDeck(_)
                | EngineError::NoEligiblePlayers(_)
                | EngineError::NoEligibleActor
                | EngineError::ChipConservation { .. }
                | EngineError::Evaluation(_)
                | EngineError::Internal(_)
                | EngineError::TableHalted(_)
        )
    }
}
