//! Persistence of [`Event`] records.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{Event, EventDraft, UnknownStatus};

pub mod memory;
pub mod postgres;

pub use memory::MemoryEventStore;
pub use postgres::PgEventStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("event {0} not found")]
    NotFound(i32),

    /// The row changed or disappeared since the caller read it.
    #[error("event {0} was modified concurrently")]
    Conflict(i32),

    #[error("stored event is unreadable: {0}")]
    CorruptRow(#[from] UnknownStatus),

    #[error("database error")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Inserts a new event and returns its generated id.
    async fn create(&self, draft: &EventDraft, created_at: DateTime<Utc>)
        -> Result<i32, StoreError>;

    async fn get(&self, id: i32) -> Result<Event, StoreError>;

    /// Replaces the editable fields of `id`.
    ///
    /// With `expected_version` set, the update only applies if the stored row
    /// version still matches; otherwise [`StoreError::Conflict`] is returned.
    async fn update(
        &self,
        id: i32,
        draft: &EventDraft,
        expected_version: Option<i32>,
    ) -> Result<(), StoreError>;

    async fn delete(&self, id: i32) -> Result<(), StoreError>;

    async fn exists(&self, id: i32) -> Result<bool, StoreError>;

    /// Every event, ascending by id.
    async fn all(&self) -> Result<Vec<Event>, StoreError>;
}
