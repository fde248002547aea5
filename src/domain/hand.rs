use core::fmt;

use serde::{Deserialize, Serialize};

/// Улица торговли.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Street {
    PreFlop,
    Flop,
    Turn,
    River,
}

impl Street {
    /// Следующая улица; `None` после ривера (дальше шоудаун).
    pub fn next(self) -> Option<Street> {
        match self {
            Street::PreFlop => Some(Street::Flop),
            Street::Flop => Some(Street::Turn),
            Street::Turn => Some(Street::River),
            Street::River => None,
        }
    }

    /// Сколько общих карт открывается при переходе на эту улицу.
    pub fn board_cards(self) -> usize {
        match self {
            Street::PreFlop => 0,
            Street::Flop => 3,
            Street::Turn | Street::River => 1,
        }
    }
}

/// Что именно раздаётся в фазе Dealing.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DealStage {
    /// Кнопка, блайнды, карманные карты.
    HoleCards,
    Flop,
    Turn,
    River,
}

impl From<Street> for DealStage {
    fn from(street: Street) -> Self {
        match street {
            Street::PreFlop => DealStage::HoleCards,
            Street::Flop => DealStage::Flop,
            Street::Turn => DealStage::Turn,
            Street::River => DealStage::River,
        }
    }
}

/// Фаза стола.
///
/// `Waiting -> Dealing(HoleCards) -> Betting(PreFlop) -> Dealing(Flop) -> ...
///  -> Betting(River) -> Showdown -> Payout -> Waiting | Dealing(HoleCards)`
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Phase {
    Waiting,
    Dealing(DealStage),
    Betting(Street),
    Showdown,
    Payout,
}

impl Phase {
    pub fn is_hand_running(self) -> bool {
        !matches!(self, Phase::Waiting)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Waiting => write!(f, "waiting"),
            Phase::Dealing(stage) => write!(f, "dealing({stage:?})"),
            Phase::Betting(street) => write!(f, "betting({street:?})"),
            Phase::Showdown => write!(f, "showdown"),
            Phase::Payout => write!(f, "payout"),
        }
    }
}
