//! Контроль времени хода (shot clock + time bank).
//!
//! Здесь собираем:
//! - правила (`TimeRules`);
//! - банк времени игроков (`TimeBank`);
//! - таймер текущего хода (`TurnClock`);
//! - фасад `TimeController`, которым пользуется актор стола.
//!
//! Время берётся из `tokio::time::Instant`, поэтому в тестах его можно
//! остановить и прокрутить вручную.

pub mod clock;
pub mod time_bank;
pub mod time_rules;

pub use clock::{ClockedTurn, TimeoutState, TurnClock};
pub use time_bank::{PlayerTimeBank, TimeBank};
pub use time_rules::TimeRules;

use std::time::Duration;

use tokio::time::Instant;

use crate::domain::PlayerId;
use crate::engine::PendingAction;

/// Таймер хода одного стола.
#[derive(Clone, Debug)]
pub struct TimeController {
    pub rules: TimeRules,
    pub bank: TimeBank,
    pub clock: TurnClock,
}

impl TimeController {
    pub fn new(rules: TimeRules) -> Self {
        Self {
            rules,
            bank: TimeBank::new(),
            clock: TurnClock::new(),
        }
    }

    pub fn register_player(&mut self, player_id: PlayerId) {
        self.bank.ensure(player_id, &self.rules);
    }

    pub fn forget_player(&mut self, player_id: PlayerId) {
        self.bank.remove(player_id);
    }

    /// Синхронизировать таймер с тем, кто сейчас должен ходить.
    ///
    /// Новый ход получает базовое время от `now`; тот же ход (тот же
    /// `turn_seq`) сохраняет свой дедлайн; нет хода – таймер снят.
    pub fn arm(&mut self, pending: Option<PendingAction>, now: Instant) -> Option<Instant> {
        match pending {
            Some(p) if self.clock.is_armed_for(&p) => {}
            Some(p) => self.clock.start(p, now + self.rules.base_action()),
            None => self.clock.clear(),
        }
        self.clock.deadline()
    }

    /// Дедлайн наступил: продлить из таймбанка или объявить таймаут.
    /// Таймаут снимает таймер, так что на один ход он срабатывает один раз.
    pub fn on_deadline(&mut self, now: Instant) -> TimeoutState {
        let Some(turn) = self.clock.current().copied() else {
            return TimeoutState::NoActiveTurn;
        };
        if now < turn.deadline {
            return TimeoutState::Ongoing;
        }
        let granted = self
            .bank
            .grant_for_turn(turn.pending.player_id, self.rules.bank_step_secs);
        if granted > 0 {
            let deadline = now + Duration::from_secs(granted as u64);
            self.clock.extend(deadline);
            return TimeoutState::Extended {
                granted_secs: granted,
                deadline,
            };
        }
        self.clock.clear();
        TimeoutState::TimedOut(turn.pending)
    }

    pub fn remaining_bank(&self, player_id: PlayerId) -> u32 {
        self.bank.remaining_for(player_id)
    }
}
