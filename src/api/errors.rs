use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::EngineError;

/// Ошибки внешнего API (то, что отдаём транспорту / клиенту).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Команда отклонена, состояние стола не изменилось.
    #[error("команда отклонена: {0}")]
    Rejected(String),

    /// Стол остановлен из-за нарушения инварианта.
    #[error("стол остановлен: {0}")]
    Fatal(String),

    /// Стол не найден или его цикл уже завершён.
    #[error("стол недоступен: {0}")]
    Unavailable(String),
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        if err.is_fatal() {
            ApiError::Fatal(err.to_string())
        } else {
            ApiError::Rejected(err.to_string())
        }
    }
}
