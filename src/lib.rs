//! Движок покерного стола (No-Limit Texas Hold'em).
//!
//! Слои:
//! - `domain` – карты, колода, места, фишки, конфиг стола;
//! - `eval` – оценка лучшей 5-карточной руки из 7 карт;
//! - `engine` – машина состояний раздачи, ставки, банки, шоудаун;
//! - `time_ctrl` – время на ход и таймбанк;
//! - `runtime` – актор на каждый стол и менеджер столов (tokio);
//! - `api` – команды, события и DTO для внешнего транспорта;
//! - `infra` – ID и источники случайности.

pub mod api;
pub mod domain;
pub mod engine;
pub mod eval;
pub mod infra;
pub mod runtime;
pub mod time_ctrl;
