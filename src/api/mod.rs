//! Внешний API стола.
//!
//! Здесь описываются:
//! - команды (commands.rs) — всё, что меняет состояние стола;
//! - события (events.rs) — что стол сообщает наружу;
//! - DTO (dto.rs) — снимки, результаты, запросы хода;
//! - ошибки (errors.rs) — то, что видит клиент.

pub mod commands;
pub mod dto;
pub mod errors;
pub mod events;

pub use commands::*;
pub use dto::*;
pub use errors::*;
pub use events::*;
