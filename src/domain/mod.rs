//! Доменная модель стола: карты, колода, места, фишки, фазы.

pub mod card;
pub mod chips;
pub mod deck;
pub mod hand;
pub mod ledger;
pub mod seat;
pub mod table;

// Базовые идентификаторы.
pub type PlayerId = u64;
pub type TableId = u64;
pub type HandId = u64;

/// Индекс места за столом (0..max_seats-1).
pub type SeatIndex = u8;

// Удобные реэкспорты, чтобы в других модулях писать crate::domain::Card и т.п.
pub use card::*;
pub use chips::*;
pub use deck::*;
pub use hand::*;
pub use ledger::*;
pub use seat::*;
pub use table::*;
