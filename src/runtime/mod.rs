//! Асинхронный рантайм: один актор на стол и менеджер независимых столов.

pub mod actor;
pub mod manager;

pub use actor::{TableActor, TableHandle, TableMessage};
pub use manager::{ManagerError, TableManager};
