use serde::{Deserialize, Serialize};

use crate::api::dto::{ActionRequest, HandResult, TableSnapshot};
use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::Street;
use crate::domain::{HandId, PlayerId, SeatIndex};
use crate::engine::actions::PlayerActionKind;
use crate::eval::HandValue;

/// Исходящие события стола.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TableEvent {
    /// Полный снимок после каждого принятого намерения и каждого перехода фазы.
    Snapshot(TableSnapshot),

    SeatTaken {
        seat: SeatIndex,
        player_id: PlayerId,
        buy_in: Chips,
    },

    /// Место освобождено, стек ушёл игроку.
    SeatVacated {
        seat: SeatIndex,
        player_id: PlayerId,
        cash_out: Chips,
    },

    HandStarted {
        hand_id: HandId,
        dealer_button: SeatIndex,
        small_blind: (SeatIndex, Chips),
        big_blind: (SeatIndex, Chips),
    },

    /// Приватное: карманные карты владельцу места.
    HoleCards {
        seat: SeatIndex,
        player_id: PlayerId,
        cards: Vec<Card>,
    },

    ActionRequired(ActionRequest),

    ActionTaken {
        seat: SeatIndex,
        player_id: PlayerId,
        action: PlayerActionKind,
        /// Сколько фишек ушло из стека этим действием.
        added: Chips,
        stack_after: Chips,
        timed_out: bool,
    },

    BoardDealt {
        street: Street,
        cards: Vec<Card>,
    },

    ShowdownReveal {
        seat: SeatIndex,
        player_id: PlayerId,
        cards: Vec<Card>,
        hand: HandValue,
    },

    HandResult(HandResult),

    HandFinished {
        hand_id: HandId,
    },

    /// Нарушен инвариант: стол больше ничего не принимает.
    TableHalted {
        reason: String,
    },
}

impl TableEvent {
    /// Кому адресовано приватное событие; `None` – всем.
    pub fn recipient(&self) -> Option<PlayerId> {
        match self {
            TableEvent::HoleCards { player_id, .. } => Some(*player_id),
            _ => None,
        }
    }

    pub fn is_snapshot(&self) -> bool {
        matches!(self, TableEvent::Snapshot(_))
    }
}
