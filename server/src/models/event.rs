use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Booking state of an event. Persisted as its variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EventStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
}

impl EventStatus {
    pub const ALL: [EventStatus; 3] = [
        EventStatus::Pending,
        EventStatus::Confirmed,
        EventStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Pending => "Pending",
            EventStatus::Confirmed => "Confirmed",
            EventStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown event status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for EventStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A stored event.
///
/// `end_time` is `None` exactly when `is_all_day` is set; otherwise it is
/// strictly after `start_time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub is_all_day: bool,
    pub location: String,
    pub guest_capacity: i32,
    pub contact_phone: Option<String>,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub row_version: i32,
}

/// The user-editable part of an event, after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub is_all_day: bool,
    pub location: String,
    pub guest_capacity: i32,
    pub contact_phone: Option<String>,
    pub status: EventStatus,
}

impl Event {
    pub fn from_draft(id: i32, draft: EventDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            start_time: draft.start_time,
            end_time: draft.end_time,
            is_all_day: draft.is_all_day,
            location: draft.location,
            guest_capacity: draft.guest_capacity,
            contact_phone: draft.contact_phone,
            status: draft.status,
            created_at,
            row_version: 1,
        }
    }

    /// Overwrites the editable fields, keeping identity and creation time.
    pub fn apply(&mut self, draft: EventDraft) {
        self.title = draft.title;
        self.description = draft.description;
        self.start_time = draft.start_time;
        self.end_time = draft.end_time;
        self.is_all_day = draft.is_all_day;
        self.location = draft.location;
        self.guest_capacity = draft.guest_capacity;
        self.contact_phone = draft.contact_phone;
        self.status = draft.status;
        self.row_version += 1;
    }
}

/// Row shape of the `events` table.
#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub is_all_day: bool,
    pub location: String,
    pub guest_capacity: i32,
    pub contact_phone: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub row_version: i32,
}

impl TryFrom<EventRow> for Event {
    type Error = UnknownStatus;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            title: row.title,
            description: row.description,
            start_time: row.start_time,
            end_time: row.end_time,
            is_all_day: row.is_all_day,
            location: row.location,
            guest_capacity: row.guest_capacity,
            contact_phone: row.contact_phone,
            status: row.status.parse()?,
            created_at: row.created_at,
            row_version: row.row_version,
        })
    }
}
