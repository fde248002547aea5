use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::{PlayerId, SeatIndex};
use crate::engine::actions::PlayerIntent;

/// Команды, которые относятся к одному столу.
///
/// Все они проходят через очередь стола и применяются строго по порядку.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TableCommand {
    /// Сесть за стол (от лобби / сессий).
    SitDown {
        seat: SeatIndex,
        player_id: PlayerId,
        buy_in: Chips,
    },

    /// Встать из-за стола. Посреди раздачи место сбрасывает карты
    /// и освобождается после выплаты.
    StandUp { seat: SeatIndex },

    /// Пропускать следующие раздачи.
    SitOut { seat: SeatIndex },

    /// Вернуться в игру со следующей раздачи.
    SitIn { seat: SeatIndex },

    /// Действие игрока от транспорта.
    Intent(PlayerIntent),

    /// Запустить раздачу вручную (когда `auto_start` выключен).
    StartHand,
}
