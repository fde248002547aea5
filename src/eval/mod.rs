//! Модуль оценки силы покерных рук (Texas Hold'em).
//!
//! Основная функция:
//!   `evaluate_best_hand(hole, board) -> Result<HandValue, EvalError>`

pub mod evaluator;
pub mod hand_value;
pub mod straights;

pub use evaluator::{evaluate_best_hand, evaluate_cards, EvalError};
pub use hand_value::{describe_hand, HandCategory, HandValue};
