//! Calendar widget wire format.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::models::{Event, EventStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarItem {
    pub id: i32,
    pub title: String,
    pub start: String,
    pub end: Option<String>,
    pub all_day: bool,
    pub extended_props: ExtendedProps,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedProps {
    pub description: Option<String>,
    pub location: String,
    pub guest_capacity: i32,
    pub contact_phone: Option<String>,
    pub status: EventStatus,
}

/// Round-trippable ISO-8601 with full sub-second precision and a `Z` suffix.
pub fn iso8601(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

impl From<&Event> for CalendarItem {
    fn from(event: &Event) -> Self {
        let end = if event.is_all_day {
            None
        } else {
            event.end_time.as_ref().map(iso8601)
        };

        Self {
            id: event.id,
            title: event.title.clone(),
            start: iso8601(&event.start_time),
            end,
            all_day: event.is_all_day,
            extended_props: ExtendedProps {
                description: event.description.clone(),
                location: event.location.clone(),
                guest_capacity: event.guest_capacity,
                contact_phone: event.contact_phone.clone(),
                status: event.status,
            },
        }
    }
}

pub fn to_calendar_items(events: &[Event]) -> Vec<CalendarItem> {
    events.iter().map(CalendarItem::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn event(is_all_day: bool) -> Event {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 18, 0, 0).unwrap()
            + Duration::nanoseconds(123_456_789);
        Event {
            id: 7,
            title: "Gala".to_string(),
            description: Some("Black tie".to_string()),
            start_time: start,
            end_time: Some(start + Duration::hours(4)),
            is_all_day,
            location: "Main hall".to_string(),
            guest_capacity: 120,
            contact_phone: None,
            status: EventStatus::Confirmed,
            created_at: start,
            row_version: 1,
        }
    }

    #[test]
    fn test_item_shape() {
        let item = CalendarItem::from(&event(false));
        let value = serde_json::to_value(&item).unwrap();

        assert_eq!(
            value,
            json!({
                "id": 7,
                "title": "Gala",
                "start": "2024-06-01T18:00:00.123456789Z",
                "end": "2024-06-01T22:00:00.123456789Z",
                "allDay": false,
                "extendedProps": {
                    "description": "Black tie",
                    "location": "Main hall",
                    "guestCapacity": 120,
                    "contactPhone": null,
                    "status": "Confirmed"
                }
            })
        );
    }

    #[test]
    fn test_all_day_item_has_null_end() {
        let item = CalendarItem::from(&event(true));
        assert!(item.all_day);
        assert_eq!(item.end, None);
    }

    #[test]
    fn test_timestamps_round_trip() {
        let source = event(false);
        let item = CalendarItem::from(&source);

        let start = DateTime::parse_from_rfc3339(&item.start).unwrap();
        let end = DateTime::parse_from_rfc3339(item.end.as_deref().unwrap()).unwrap();

        assert_eq!(start.with_timezone(&Utc), source.start_time);
        assert_eq!(Some(end.with_timezone(&Utc)), source.end_time);
    }
}
