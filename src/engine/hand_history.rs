use serde::{Deserialize, Serialize};

use crate::api::events::TableEvent;
use crate::domain::{HandId, TableId};

/// Событие в раздаче с порядковым номером.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandEvent {
    pub index: u32,
    pub event: TableEvent,
}

/// Полная история раздачи (без снимков стола).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandHistory {
    pub table_id: TableId,
    pub hand_id: HandId,
    pub events: Vec<HandEvent>,
}

impl HandHistory {
    pub fn new(table_id: TableId, hand_id: HandId) -> Self {
        Self {
            table_id,
            hand_id,
            events: Vec::new(),
        }
    }

    /// Записать событие. Снимки не пишем: они выводятся из остальных событий.
    pub fn push(&mut self, event: &TableEvent) {
        if event.is_snapshot() {
            return;
        }
        let index = self.events.len() as u32;
        self.events.push(HandEvent {
            index,
            event: event.clone(),
        });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TableEvent> {
        self.events.iter().map(|e| &e.event)
    }
}
