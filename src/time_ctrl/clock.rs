//! Таймер текущего хода (shot clock) на дедлайнах.

use tokio::time::Instant;

use crate::engine::PendingAction;

/// Ход, на который взведён таймер.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockedTurn {
    pub pending: PendingAction,
    pub deadline: Instant,
    /// Сколько раз продлевали из таймбанка.
    pub extensions: u32,
}

/// Результат срабатывания дедлайна.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeoutState {
    /// Подключили кусок таймбанка, дедлайн сдвинут.
    Extended { granted_secs: u32, deadline: Instant },
    /// Базовое время и таймбанк исчерпаны – нужен авто-Check/авто-Fold.
    TimedOut(PendingAction),
    /// Дедлайн ещё не наступил.
    Ongoing,
    /// Сейчас никто не ходит.
    NoActiveTurn,
}

/// Не больше одного взведённого хода; новый ход сбрасывает старый.
#[derive(Clone, Debug, Default)]
pub struct TurnClock {
    current: Option<ClockedTurn>,
}

impl TurnClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&ClockedTurn> {
        self.current.as_ref()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.current.map(|c| c.deadline)
    }

    pub fn start(&mut self, pending: PendingAction, deadline: Instant) {
        self.current = Some(ClockedTurn {
            pending,
            deadline,
            extensions: 0,
        });
    }

    pub fn extend(&mut self, deadline: Instant) {
        if let Some(turn) = self.current.as_mut() {
            turn.deadline = deadline;
            turn.extensions += 1;
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Таймер взведён ровно на этот ход.
    pub fn is_armed_for(&self, pending: &PendingAction) -> bool {
        self.current
            .map(|c| c.pending == *pending)
            .unwrap_or(false)
    }
}
