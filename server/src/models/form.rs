use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::event::{Event, EventStatus};

/// Raw values of the create/edit form, exactly as submitted.
///
/// Everything is kept as text so that a rejected submission can be shown
/// back to the user unchanged. Empty strings mean "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EventForm {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start_time: String,
    pub end_time: String,
    pub is_all_day: String,
    pub location: String,
    pub guest_capacity: String,
    pub contact_phone: String,
    pub status: String,
    /// Time-of-day combined with `start_time`'s date.
    pub start_time_time: String,
    /// Time-of-day combined with `end_time`'s date.
    pub end_time_time: String,
    pub row_version: String,
}

impl EventForm {
    /// Checkbox semantics: any of `true`, `on`, `1` ticks the box.
    pub fn is_all_day(&self) -> bool {
        matches!(
            self.is_all_day.trim().to_ascii_lowercase().as_str(),
            "true" | "on" | "1"
        )
    }

    /// Blank creation form, optionally seeded from a date picked on the calendar.
    pub fn prefilled(start: Option<&str>) -> Self {
        let mut form = Self {
            status: EventStatus::Pending.as_str().to_string(),
            ..Self::default()
        };

        let Some(start) = start.map(str::trim).filter(|s| !s.is_empty()) else {
            return form;
        };

        if let Ok(date) = NaiveDate::parse_from_str(start, "%Y-%m-%d") {
            form.start_time = date.to_string();
        } else if let Some(at) = parse_iso_datetime(start) {
            form.start_time = at.date().to_string();
            form.start_time_time = at.time().format("%H:%M").to_string();
        }

        form
    }

    /// Edit form populated from a stored event.
    pub fn from_event(event: &Event) -> Self {
        let (end_date, end_time) = match event.end_time {
            Some(end) => (
                end.date_naive().to_string(),
                time_of_day(end.time()),
            ),
            None => (String::new(), String::new()),
        };

        let start_time_time = if event.is_all_day {
            String::new()
        } else {
            time_of_day(event.start_time.time())
        };

        Self {
            id: event.id.to_string(),
            title: event.title.clone(),
            description: event.description.clone().unwrap_or_default(),
            start_time: event.start_time.date_naive().to_string(),
            end_time: end_date,
            is_all_day: if event.is_all_day { "true" } else { "" }.to_string(),
            location: event.location.clone(),
            guest_capacity: event.guest_capacity.to_string(),
            contact_phone: event.contact_phone.clone().unwrap_or_default(),
            status: event.status.as_str().to_string(),
            start_time_time,
            end_time_time: end_time,
            row_version: event.row_version.to_string(),
        }
    }
}

/// `HH:MM`, widened to seconds and fractions only when they are set, so a
/// stored event re-submits to the same instant.
fn time_of_day(at: NaiveTime) -> String {
    let format = if at.nanosecond() != 0 {
        "%H:%M:%S%.f"
    } else if at.second() != 0 {
        "%H:%M:%S"
    } else {
        "%H:%M"
    };
    at.format(format).to_string()
}

fn parse_iso_datetime(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc).naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}
