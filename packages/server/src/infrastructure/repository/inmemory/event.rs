//! InMemory Event Repository 実装

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Event, EventId, EventRepository, RepositoryError};

/// インメモリ Event Repository 実装
#[derive(Default)]
pub struct InMemoryEventRepository {
    events: Mutex<HashMap<EventId, Event>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn scan_events(&self) -> Result<Vec<Event>, RepositoryError> {
        let events = self.events.lock().await;
        Ok(events.values().cloned().collect())
    }

    async fn insert_event(&self, event: Event) -> Result<(), RepositoryError> {
        let mut events = self.events.lock().await;
        events.insert(event.id.clone(), event);
        Ok(())
    }
}
