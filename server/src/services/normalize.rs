//! Turns a submitted [`EventForm`] into an [`EventDraft`] ready to persist.
//!
//! Non all-day events carry their time of day in separate inputs
//! (`StartTimeTime`, `EndTimeTime`); they are merged into the submitted dates
//! here. All-day events drop their end and ignore both time-of-day inputs.
//!
//! Errors are collected per field and returned together.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use thiserror::Error;

use crate::models::{EventDraft, EventForm, EventStatus};

pub const TITLE_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 500;
pub const LOCATION_MAX_LEN: usize = 100;
pub const CONTACT_PHONE_MAX_LEN: usize = 20;
pub const GUEST_CAPACITY_MIN: i32 = 1;
pub const GUEST_CAPACITY_MAX: i32 = 500;

pub const FIELD_TITLE: &str = "Title";
pub const FIELD_DESCRIPTION: &str = "Description";
pub const FIELD_START_TIME: &str = "StartTime";
pub const FIELD_END_TIME: &str = "EndTime";
pub const FIELD_START_TIME_OF_DAY: &str = "StartTimeTime";
pub const FIELD_END_TIME_OF_DAY: &str = "EndTimeTime";
pub const FIELD_LOCATION: &str = "Location";
pub const FIELD_GUEST_CAPACITY: &str = "GuestCapacity";
pub const FIELD_CONTACT_PHONE: &str = "ContactPhone";
pub const FIELD_STATUS: &str = "Status";

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const TIME_OF_DAY_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %I:%M %p",
    "%Y-%m-%d %I:%M:%S %p",
    "%Y-%m-%d %I:%M%p",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    TitleRequired,
    TitleTooLong,
    DescriptionTooLong,
    StartDateRequired,
    InvalidStartDate,
    InvalidEndDate,
    StartTimeRequired,
    InvalidStartTime,
    EndTimeRequired,
    InvalidEndTime,
    EndBeforeStart,
    LocationRequired,
    LocationTooLong,
    GuestCapacityRequired,
    InvalidGuestCapacity,
    GuestCapacityOutOfRange,
    ContactPhoneTooLong,
    StatusRequired,
    InvalidStatus,
}

impl FieldError {
    pub fn code(&self) -> &'static str {
        match self {
            FieldError::TitleRequired => "title_required",
            FieldError::TitleTooLong => "title_too_long",
            FieldError::DescriptionTooLong => "description_too_long",
            FieldError::StartDateRequired => "start_date_required",
            FieldError::InvalidStartDate => "invalid_start_date",
            FieldError::InvalidEndDate => "invalid_end_date",
            FieldError::StartTimeRequired => "start_time_required",
            FieldError::InvalidStartTime => "invalid_start_time",
            FieldError::EndTimeRequired => "end_time_required",
            FieldError::InvalidEndTime => "invalid_end_time",
            FieldError::EndBeforeStart => "end_before_start",
            FieldError::LocationRequired => "location_required",
            FieldError::LocationTooLong => "location_too_long",
            FieldError::GuestCapacityRequired => "guest_capacity_required",
            FieldError::InvalidGuestCapacity => "invalid_guest_capacity",
            FieldError::GuestCapacityOutOfRange => "guest_capacity_out_of_range",
            FieldError::ContactPhoneTooLong => "contact_phone_too_long",
            FieldError::StatusRequired => "status_required",
            FieldError::InvalidStatus => "invalid_status",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            FieldError::TitleRequired => "Title is required.",
            FieldError::TitleTooLong => "Title must be at most 100 characters.",
            FieldError::DescriptionTooLong => "Description must be at most 500 characters.",
            FieldError::StartDateRequired => "Start date is required.",
            FieldError::InvalidStartDate => "Start date is not a valid date.",
            FieldError::InvalidEndDate => "End date is not a valid date.",
            FieldError::StartTimeRequired => "Start time is required.",
            FieldError::InvalidStartTime => "Invalid start time format.",
            FieldError::EndTimeRequired => "End time is required for non all-day events.",
            FieldError::InvalidEndTime => "Invalid end time format.",
            FieldError::EndBeforeStart => "End time must be after start time.",
            FieldError::LocationRequired => "Location is required.",
            FieldError::LocationTooLong => "Location must be at most 100 characters.",
            FieldError::GuestCapacityRequired => "Guest capacity is required.",
            FieldError::InvalidGuestCapacity => "Guest capacity must be a whole number.",
            FieldError::GuestCapacityOutOfRange => "Guest capacity must be between 1 and 500.",
            FieldError::ContactPhoneTooLong => "Contact phone must be at most 20 characters.",
            FieldError::StatusRequired => "Status is required.",
            FieldError::InvalidStatus => "Status must be Pending, Confirmed or Completed.",
        }
    }

    /// Malformed input as opposed to missing or out-of-range input.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            FieldError::InvalidStartDate
                | FieldError::InvalidEndDate
                | FieldError::InvalidStartTime
                | FieldError::InvalidEndTime
                | FieldError::InvalidGuestCapacity
        )
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Field name to the errors raised on that field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", self.codes().join(", "))]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, Vec<FieldError>>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, error: FieldError) {
        self.fields.entry(field).or_default().push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, field: &str) -> &[FieldError] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, error: FieldError) -> bool {
        self.fields.values().any(|errors| errors.contains(&error))
    }

    pub fn codes(&self) -> Vec<&'static str> {
        self.fields
            .values()
            .flatten()
            .map(FieldError::code)
            .collect()
    }
}

enum DateInput {
    Missing,
    Invalid,
    Value(NaiveDateTime),
}

/// Validates `form` and resolves its start/end timestamps.
pub fn normalize(form: &EventForm) -> Result<EventDraft, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let title = required_text(
        &form.title,
        TITLE_MAX_LEN,
        FIELD_TITLE,
        FieldError::TitleRequired,
        FieldError::TitleTooLong,
        &mut errors,
    );
    let description = optional_text(
        &form.description,
        DESCRIPTION_MAX_LEN,
        FIELD_DESCRIPTION,
        FieldError::DescriptionTooLong,
        &mut errors,
    );
    let location = required_text(
        &form.location,
        LOCATION_MAX_LEN,
        FIELD_LOCATION,
        FieldError::LocationRequired,
        FieldError::LocationTooLong,
        &mut errors,
    );
    let contact_phone = optional_text(
        &form.contact_phone,
        CONTACT_PHONE_MAX_LEN,
        FIELD_CONTACT_PHONE,
        FieldError::ContactPhoneTooLong,
        &mut errors,
    );
    let guest_capacity = parse_guest_capacity(&form.guest_capacity, &mut errors);
    let status = parse_status(&form.status, &mut errors);

    let start_date = match parse_date_input(&form.start_time) {
        DateInput::Missing => {
            errors.add(FIELD_START_TIME, FieldError::StartDateRequired);
            None
        }
        DateInput::Invalid => {
            errors.add(FIELD_START_TIME, FieldError::InvalidStartDate);
            None
        }
        DateInput::Value(at) => Some(at),
    };

    let is_all_day = form.is_all_day();
    let (start_time, end_time) = if is_all_day {
        let start = start_date.map(|at| at.date().and_time(NaiveTime::MIN));
        (start, None)
    } else {
        resolve_time_range(form, start_date, &mut errors)
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    let (Some(title), Some(location), Some(guest_capacity), Some(status), Some(start_time)) =
        (title, location, guest_capacity, status, start_time)
    else {
        return Err(errors);
    };

    Ok(EventDraft {
        title,
        description,
        start_time: start_time.and_utc(),
        end_time: end_time.map(|at| at.and_utc()),
        is_all_day,
        location,
        guest_capacity,
        contact_phone,
        status,
    })
}

fn resolve_time_range(
    form: &EventForm,
    start_date: Option<NaiveDateTime>,
    errors: &mut ValidationErrors,
) -> (Option<NaiveDateTime>, Option<NaiveDateTime>) {
    let start = match (start_date, non_empty(&form.start_time_time)) {
        (_, None) => {
            errors.add(FIELD_START_TIME_OF_DAY, FieldError::StartTimeRequired);
            None
        }
        (Some(date), Some(time_of_day)) => {
            let combined = combine(date.date(), time_of_day);
            if combined.is_none() {
                errors.add(FIELD_START_TIME_OF_DAY, FieldError::InvalidStartTime);
            }
            combined
        }
        // The start date error has already been recorded.
        (None, Some(_)) => None,
    };

    let end = match parse_date_input(&form.end_time) {
        DateInput::Missing => {
            errors.add(FIELD_END_TIME, FieldError::EndTimeRequired);
            None
        }
        DateInput::Invalid => {
            errors.add(FIELD_END_TIME, FieldError::InvalidEndDate);
            None
        }
        DateInput::Value(date) => match non_empty(&form.end_time_time) {
            Some(time_of_day) => {
                let combined = combine(date.date(), time_of_day);
                if combined.is_none() {
                    errors.add(FIELD_END_TIME_OF_DAY, FieldError::InvalidEndTime);
                }
                combined
            }
            None => Some(date),
        },
    };

    if let (Some(start), Some(end)) = (start, end) {
        if end <= start {
            errors.add(FIELD_END_TIME, FieldError::EndBeforeStart);
        }
    }

    (start, end)
}

/// Parses `"<date> <time_of_day>"` as a wall-clock timestamp.
fn combine(date: NaiveDate, time_of_day: &str) -> Option<NaiveDateTime> {
    let text = format!("{} {}", date.format("%Y-%m-%d"), time_of_day);
    TIME_OF_DAY_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&text, fmt).ok())
}

fn parse_date_input(raw: &str) -> DateInput {
    let Some(raw) = non_empty(raw) else {
        return DateInput::Missing;
    };

    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return DateInput::Value(at.with_timezone(&Utc).naive_utc());
    }

    let parsed = DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        });

    match parsed {
        Some(at) => DateInput::Value(at),
        None => DateInput::Invalid,
    }
}

fn non_empty(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn required_text(
    raw: &str,
    max_len: usize,
    field: &'static str,
    missing: FieldError,
    too_long: FieldError,
    errors: &mut ValidationErrors,
) -> Option<String> {
    let Some(value) = non_empty(raw) else {
        errors.add(field, missing);
        return None;
    };
    if value.chars().count() > max_len {
        errors.add(field, too_long);
        return None;
    }
    Some(value.to_string())
}

fn optional_text(
    raw: &str,
    max_len: usize,
    field: &'static str,
    too_long: FieldError,
    errors: &mut ValidationErrors,
) -> Option<String> {
    let value = non_empty(raw)?;
    if value.chars().count() > max_len {
        errors.add(field, too_long);
        return None;
    }
    Some(value.to_string())
}

fn parse_guest_capacity(raw: &str, errors: &mut ValidationErrors) -> Option<i32> {
    let Some(value) = non_empty(raw) else {
        errors.add(FIELD_GUEST_CAPACITY, FieldError::GuestCapacityRequired);
        return None;
    };
    let Ok(capacity) = value.parse::<i32>() else {
        errors.add(FIELD_GUEST_CAPACITY, FieldError::InvalidGuestCapacity);
        return None;
    };
    if !(GUEST_CAPACITY_MIN..=GUEST_CAPACITY_MAX).contains(&capacity) {
        errors.add(FIELD_GUEST_CAPACITY, FieldError::GuestCapacityOutOfRange);
        return None;
    }
    Some(capacity)
}

fn parse_status(raw: &str, errors: &mut ValidationErrors) -> Option<EventStatus> {
    let Some(value) = non_empty(raw) else {
        errors.add(FIELD_STATUS, FieldError::StatusRequired);
        return None;
    };
    match value.parse() {
        Ok(status) => Some(status),
        Err(_) => {
            errors.add(FIELD_STATUS, FieldError::InvalidStatus);
            None
        }
    }
}
