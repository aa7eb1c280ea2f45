use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{EventStore, StoreError};
use crate::models::{Event, EventDraft};

#[derive(Default)]
struct Inner {
    next_id: i32,
    events: BTreeMap<i32, Event>,
}

/// Process-local event store. Used by tests and when no database is configured.
#[derive(Default)]
pub struct MemoryEventStore {
    inner: RwLock<Inner>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn create(
        &self,
        draft: &EventDraft,
        created_at: DateTime<Utc>,
    ) -> Result<i32, StoreError> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let id = inner.next_id;
        inner
            .events
            .insert(id, Event::from_draft(id, draft.clone(), created_at));
        Ok(id)
    }

    async fn get(&self, id: i32) -> Result<Event, StoreError> {
        self.inner
            .read()
            .await
            .events
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn update(
        &self,
        id: i32,
        draft: &EventDraft,
        expected_version: Option<i32>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let event = inner.events.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        if expected_version.is_some_and(|version| version != event.row_version) {
            return Err(StoreError::Conflict(id));
        }

        event.apply(draft.clone());
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .events
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn exists(&self, id: i32) -> Result<bool, StoreError> {
        Ok(self.inner.read().await.events.contains_key(&id))
    }

    async fn all(&self) -> Result<Vec<Event>, StoreError> {
        Ok(self.inner.read().await.events.values().cloned().collect())
    }
}
