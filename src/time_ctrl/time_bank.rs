//! Таймбанк игроков: сколько секунд дополнительного времени у кого осталось.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::PlayerId;

use super::TimeRules;

/// Таймбанк одного игрока (секунды).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerTimeBank {
    pub remaining_secs: u32,
}

impl PlayerTimeBank {
    pub fn new(initial_secs: u32) -> Self {
        Self {
            remaining_secs: initial_secs,
        }
    }

    /// Выдать `requested` секунд. Возвращает фактически выданное
    /// (меньше, если банк пустеет).
    pub fn grant(&mut self, requested: u32) -> u32 {
        let grant = requested.min(self.remaining_secs);
        self.remaining_secs -= grant;
        grant
    }
}

/// Таймбанки всех игроков стола.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TimeBank {
    players: HashMap<PlayerId, PlayerTimeBank>,
}

impl TimeBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Завести банк игроку, если его ещё нет.
    pub fn ensure(&mut self, player_id: PlayerId, rules: &TimeRules) {
        self.players
            .entry(player_id)
            .or_insert_with(|| PlayerTimeBank::new(rules.bank_per_player_secs));
    }

    /// Игрок ушёл со стола – банк сгорает.
    pub fn remove(&mut self, player_id: PlayerId) {
        self.players.remove(&player_id);
    }

    pub fn grant_for_turn(&mut self, player_id: PlayerId, requested: u32) -> u32 {
        self.players
            .get_mut(&player_id)
            .map(|bank| bank.grant(requested))
            .unwrap_or(0)
    }

    /// Остаток таймбанка у игрока (для отображения).
    pub fn remaining_for(&self, player_id: PlayerId) -> u32 {
        self.players
            .get(&player_id)
            .map(|b| b.remaining_secs)
            .unwrap_or(0)
    }
}
