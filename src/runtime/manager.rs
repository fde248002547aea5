use std::collections::HashMap;

use thiserror::Error;
use tracing::info;

use crate::api::errors::ApiError;
use crate::domain::table::TableConfig;
use crate::domain::TableId;
use crate::engine::{EngineError, RandomSource, TableEngine};
use crate::infra::ids::IdGenerator;
use crate::runtime::actor::{TableActor, TableHandle};

/// Ошибки уровня менеджера столов.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManagerError {
    #[error("стол {0} не найден")]
    TableNotFound(TableId),

    /// Цикл стола завершён, команды больше не принимаются.
    #[error("стол {0} закрыт")]
    TableClosed(TableId),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl From<ManagerError> for ApiError {
    fn from(err: ManagerError) -> Self {
        match err {
            ManagerError::Engine(e) => e.into(),
            other => ApiError::Unavailable(other.to_string()),
        }
    }
}

/// Менеджер столов: каждый стол – отдельный актор, общего состояния нет.
#[derive(Default)]
pub struct TableManager {
    tables: HashMap<TableId, TableHandle>,
    ids: IdGenerator,
}

impl TableManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Создать стол и запустить его актор. Вызывать внутри рантайма tokio.
    pub fn create_table<R>(&mut self, config: TableConfig, rng: R) -> Result<TableHandle, ManagerError>
    where
        R: RandomSource + Send + 'static,
    {
        let table_id = self.ids.next_table_id();
        let engine = TableEngine::new(table_id, config, rng)?;
        let handle = TableActor::spawn(engine);
        self.tables.insert(table_id, handle.clone());
        info!(table_id, "стол создан");
        Ok(handle)
    }

    pub fn table(&self, table_id: TableId) -> Result<&TableHandle, ManagerError> {
        self.tables
            .get(&table_id)
            .ok_or(ManagerError::TableNotFound(table_id))
    }

    pub fn table_ids(&self) -> Vec<TableId> {
        let mut ids: Vec<TableId> = self.tables.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub async fn close_table(&mut self, table_id: TableId) -> Result<(), ManagerError> {
        let handle = self
            .tables
            .remove(&table_id)
            .ok_or(ManagerError::TableNotFound(table_id))?;
        handle.shutdown().await
    }

    pub async fn shutdown_all(&mut self) {
        for (_, handle) in self.tables.drain() {
            // Уже закрытый стол – не ошибка при общем выключении.
            let _ = handle.shutdown().await;
        }
    }
}
