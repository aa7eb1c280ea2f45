use crate::models::Event;

/// Ordering of the event table, taken from the `sortOrder` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    DateAsc,
    DateDesc,
}

impl SortOrder {
    /// Anything other than `date_desc` sorts ascending.
    pub fn from_param(param: Option<&str>) -> Self {
        match param.map(str::trim) {
            Some("date_desc") => SortOrder::DateDesc,
            _ => SortOrder::DateAsc,
        }
    }

    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::DateAsc => "date",
            SortOrder::DateDesc => "date_desc",
        }
    }

    /// The order the table header link switches to.
    pub fn toggled(&self) -> Self {
        match self {
            SortOrder::DateAsc => SortOrder::DateDesc,
            SortOrder::DateDesc => SortOrder::DateAsc,
        }
    }
}

/// Sorts by start time. Events starting together keep their store order.
pub fn list(mut events: Vec<Event>, order: SortOrder) -> Vec<Event> {
    match order {
        SortOrder::DateAsc => events.sort_by(|a, b| a.start_time.cmp(&b.start_time)),
        SortOrder::DateDesc => events.sort_by(|a, b| b.start_time.cmp(&a.start_time)),
    }
    events
}

/// Keeps events whose status name equals `status_filter` exactly. An absent
/// or blank filter keeps everything.
pub fn feed(events: Vec<Event>, status_filter: Option<&str>) -> Vec<Event> {
    match status_filter.filter(|s| !s.is_empty()) {
        Some(status) => events
            .into_iter()
            .filter(|event| event.status.as_str() == status)
            .collect(),
        None => events,
    }
}
