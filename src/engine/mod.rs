//! Покерный движок: ставки, переход улиц, сайд-поты, шоудаун.
//!
//! Высокоуровневый объект: `TableEngine`
//! Основные операции:
//!   - `sit_down` / `stand_up` – места и фишки;
//!   - `start_hand` – запустить новую раздачу;
//!   - `apply_intent` – применить действие игрока;
//!   - `apply_timeout` – авто-check/fold по истечении времени хода.

pub mod actions;
pub mod betting;
pub mod errors;
pub mod game_loop;
pub mod hand_history;
pub mod positions;
pub mod pot;
pub mod validation;

pub use actions::{PlayerActionKind, PlayerIntent};
pub use betting::BettingRound;
pub use errors::EngineError;
pub use game_loop::{HandState, PendingAction, TableEngine};
pub use hand_history::{HandEvent, HandHistory};
pub use pot::{Pot, PotAccountant, PotAward, PotId};
pub use validation::LegalAction;

/// Источник случайности для перемешивания колоды.
/// Реализации – в `infra::rng`.
pub trait RandomSource {
    fn shuffle<T>(&mut self, slice: &mut [T]);
}
