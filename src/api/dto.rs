use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::Phase;
use crate::domain::seat::SeatStatus;
use crate::domain::table::TableStakes;
use crate::domain::{HandId, PlayerId, SeatIndex, TableId};
use crate::engine::pot::{Pot, PotId};
use crate::engine::validation::LegalAction;
use crate::eval::HandValue;

/// Место глазами наблюдателя.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatView {
    pub seat: SeatIndex,
    pub player_id: Option<PlayerId>,
    pub stack: Chips,
    pub status: SeatStatus,
    pub committed_round: Chips,
    pub committed_hand: Chips,
    /// Есть ли у места карты на руках (даже если они скрыты).
    pub has_cards: bool,
    /// Карманные карты – только свои или вскрытые на шоудауне.
    pub hole_cards: Option<Vec<Card>>,
    pub sit_out_next: bool,
    pub leaving: bool,
}

/// Снимок стола для рендера. `seq` растёт с каждым снимком.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableSnapshot {
    pub table_id: TableId,
    pub seq: u64,
    pub hand_id: Option<HandId>,
    pub phase: Phase,
    pub dealer_button: Option<SeatIndex>,
    pub stakes: TableStakes,
    pub board: Vec<Card>,
    pub seats: Vec<SeatView>,
    pub pots: Vec<Pot>,
    pub pot_total: Chips,
    pub current_actor: Option<SeatIndex>,
    pub bet_to_match: Chips,
    pub min_raise: Chips,
    /// Причина остановки стола, если он остановлен.
    pub halted: Option<String>,
}

impl TableSnapshot {
    pub fn seat(&self, seat: SeatIndex) -> Option<&SeatView> {
        self.seats.get(seat as usize)
    }
}

/// Итог одного банка на выплате.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandResult {
    pub hand_id: HandId,
    pub pot_id: PotId,
    pub winning_seats: Vec<SeatIndex>,
    pub amount: Chips,
    /// Сколько досталось каждому победителю (остаток – первому по часовой от дилера).
    pub payouts: Vec<(SeatIndex, Chips)>,
    /// `None`, если банк забран без шоудауна.
    pub winning_hand: Option<HandValue>,
    pub description: Option<String>,
}

/// Запрос хода: кто ходит, что можно, до какого момента.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionRequest {
    pub seat: SeatIndex,
    pub player_id: PlayerId,
    /// Номер хода; таймаут с чужим номером игнорируется.
    pub turn_seq: u64,
    pub legal_actions: Vec<LegalAction>,
    pub to_call: Chips,
    /// Дедлайн в unix-миллисекундах; проставляет рантайм, у голого движка `None`.
    pub deadline_unix_ms: Option<u64>,
    /// Остаток банка времени игрока.
    pub time_bank_secs: u32,
}
