use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;

use super::{EventStore, StoreError};
use crate::models::{Event, EventDraft, EventRow};

const EVENT_COLUMNS: &str = "id, title, description, start_time, end_time, is_all_day, \
     location, guest_capacity, contact_phone, status, created_at, row_version";

/// Event store backed by the `events` table.
#[derive(Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn create(
        &self,
        draft: &EventDraft,
        created_at: DateTime<Utc>,
    ) -> Result<i32, StoreError> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO events (title, description, start_time, end_time, is_all_day,
                                location, guest_capacity, contact_phone, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(draft.start_time)
        .bind(draft.end_time)
        .bind(draft.is_all_day)
        .bind(&draft.location)
        .bind(draft.guest_capacity)
        .bind(&draft.contact_phone)
        .bind(draft.status.as_str())
        .bind(created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn get(&self, id: i32) -> Result<Event, StoreError> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound(id))?;

        Ok(Event::try_from(row)?)
    }

    async fn update(
        &self,
        id: i32,
        draft: &EventDraft,
        expected_version: Option<i32>,
    ) -> Result<(), StoreError> {
        // Rolled back on drop unless committed below.
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE events
            SET title = $2, description = $3, start_time = $4, end_time = $5,
                is_all_day = $6, location = $7, guest_capacity = $8,
                contact_phone = $9, status = $10, row_version = row_version + 1
            WHERE id = $1 AND ($11::INTEGER IS NULL OR row_version = $11)
            "#,
        )
        .bind(id)
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(draft.start_time)
        .bind(draft.end_time)
        .bind(draft.is_all_day)
        .bind(&draft.location)
        .bind(draft.guest_capacity)
        .bind(&draft.contact_phone)
        .bind(draft.status.as_str())
        .bind(expected_version)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM events WHERE id = $1)")
                    .bind(id)
                    .fetch_one(&mut *tx)
                    .await?;
            debug!(event_id = id, exists, "Update matched no row");
            return Err(if exists {
                StoreError::Conflict(id)
            } else {
                StoreError::NotFound(id)
            });
        }

        tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn exists(&self, id: i32) -> Result<bool, StoreError> {
        let exists = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM events WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn all(&self) -> Result<Vec<Event>, StoreError> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| Event::try_from(row).map_err(StoreError::from))
            .collect()
    }
}
