//! Server-rendered HTML pages.

use std::fmt::Write;

use crate::models::{Event, EventForm, EventStatus};
use crate::services::calendar::iso8601;
use crate::services::listing::SortOrder;
use crate::services::normalize::{
    ValidationErrors, FIELD_CONTACT_PHONE, FIELD_DESCRIPTION, FIELD_END_TIME,
    FIELD_END_TIME_OF_DAY, FIELD_GUEST_CAPACITY, FIELD_LOCATION, FIELD_START_TIME,
    FIELD_START_TIME_OF_DAY, FIELD_STATUS, FIELD_TITLE,
};

const FULLCALENDAR_JS: &str =
    "https://cdn.jsdelivr.net/npm/fullcalendar@6.1.11/index.global.min.js";

/// Which form is being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i32),
}

impl FormMode {
    fn action(&self) -> String {
        match self {
            FormMode::Create => "/Events/Create".to_string(),
            FormMode::Edit(id) => format!("/Events/Edit/{id}"),
        }
    }

    fn heading(&self) -> &'static str {
        match self {
            FormMode::Create => "Create event",
            FormMode::Edit(_) => "Edit event",
        }
    }
}

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, head: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{} - SlivEliteEvents</title>\n{}</head>\n<body>\n\
         <nav><a href=\"/Events\">Calendar</a> | <a href=\"/Events/List\">All events</a> | \
         <a href=\"/Events/Create\">New event</a></nav>\n<main>\n{}</main>\n</body>\n</html>\n",
        escape(title),
        head,
        body
    )
}

/// Page hosting the calendar widget; events are fetched from the JSON feed.
pub fn calendar_page() -> String {
    let head = format!("<script src=\"{FULLCALENDAR_JS}\"></script>\n");
    let body = r#"<h1>Events</h1>
<label>Status
<select id="status-filter">
<option value="">All</option>
<option>Pending</option>
<option>Confirmed</option>
<option>Completed</option>
</select>
</label>
<div id="calendar" data-feed="/Events/GetEvents" data-create="/Events/Create"></div>
<script src="/static/calendar.js"></script>
"#;
    layout("Calendar", &head, body)
}

fn field_errors(errors: Option<&ValidationErrors>, field: &str) -> String {
    let Some(errors) = errors else {
        return String::new();
    };
    errors
        .field(field)
        .iter()
        .fold(String::new(), |mut out, error| {
            let class = if error.is_parse_error() {
                "field-error invalid-format"
            } else {
                "field-error"
            };
            let _ = write!(
                out,
                "<span class=\"{class}\" data-code=\"{}\">{}</span>",
                error.code(),
                escape(error.message())
            );
            out
        })
}

fn text_input(
    label: &str,
    name: &str,
    kind: &str,
    value: &str,
    errors: Option<&ValidationErrors>,
) -> String {
    format!(
        "<div><label for=\"{name}\">{label}</label>\
         <input type=\"{kind}\" id=\"{name}\" name=\"{name}\" value=\"{}\">{}</div>\n",
        escape(value),
        field_errors(errors, name)
    )
}

/// Create/edit form, repopulated with `form` and annotated with `errors`.
pub fn event_form_page(
    mode: FormMode,
    form: &EventForm,
    errors: Option<&ValidationErrors>,
) -> String {
    let mut body = format!(
        "<h1>{}</h1>\n<form method=\"post\" action=\"{}\">\n",
        mode.heading(),
        mode.action()
    );

    if let FormMode::Edit(_) = mode {
        let _ = write!(
            body,
            "<input type=\"hidden\" name=\"Id\" value=\"{}\">\n\
             <input type=\"hidden\" name=\"RowVersion\" value=\"{}\">\n",
            escape(&form.id),
            escape(&form.row_version)
        );
    }

    body.push_str(&text_input("Title", FIELD_TITLE, "text", &form.title, errors));
    let _ = write!(
        body,
        "<div><label for=\"{FIELD_DESCRIPTION}\">Description</label>\
         <textarea id=\"{FIELD_DESCRIPTION}\" name=\"{FIELD_DESCRIPTION}\">{}</textarea>{}</div>\n",
        escape(&form.description),
        field_errors(errors, FIELD_DESCRIPTION)
    );
    let _ = write!(
        body,
        "<div><label><input type=\"checkbox\" name=\"IsAllDay\" value=\"true\"{}> All day</label></div>\n",
        if form.is_all_day() { " checked" } else { "" }
    );
    body.push_str(&text_input("Start date", FIELD_START_TIME, "date", &form.start_time, errors));
    body.push_str(&text_input(
        "Start time",
        FIELD_START_TIME_OF_DAY,
        "time",
        &form.start_time_time,
        errors,
    ));
    body.push_str(&text_input("End date", FIELD_END_TIME, "date", &form.end_time, errors));
    body.push_str(&text_input(
        "End time",
        FIELD_END_TIME_OF_DAY,
        "time",
        &form.end_time_time,
        errors,
    ));
    body.push_str(&text_input("Location", FIELD_LOCATION, "text", &form.location, errors));
    body.push_str(&text_input(
        "Guest capacity",
        FIELD_GUEST_CAPACITY,
        "number",
        &form.guest_capacity,
        errors,
    ));
    body.push_str(&text_input(
        "Contact phone",
        FIELD_CONTACT_PHONE,
        "tel",
        &form.contact_phone,
        errors,
    ));

    let _ = write!(body, "<div><label for=\"{FIELD_STATUS}\">Status</label><select id=\"{FIELD_STATUS}\" name=\"{FIELD_STATUS}\">");
    for status in EventStatus::ALL {
        let selected = if form.status == status.as_str() { " selected" } else { "" };
        let _ = write!(body, "<option{selected}>{status}</option>");
    }
    let _ = writeln!(body, "</select>{}</div>", field_errors(errors, FIELD_STATUS));

    body.push_str("<button type=\"submit\">Save</button>\n</form>\n");
    layout(mode.heading(), "", &body)
}

/// Table of all events, already sorted as `order`.
pub fn event_list_page(events: &[Event], order: SortOrder) -> String {
    let mut body = format!(
        "<h1>All events</h1>\n<table>\n<thead><tr><th>Title</th>\
         <th><a href=\"/Events/List?sortOrder={}\">Start</a></th><th>End</th>\
         <th>Location</th><th>Guests</th><th>Status</th><th></th></tr></thead>\n<tbody>\n",
        order.toggled().as_param()
    );

    for event in events {
        let end = match (event.is_all_day, &event.end_time) {
            (true, _) => "All day".to_string(),
            (false, Some(end)) => iso8601(end),
            (false, None) => String::new(),
        };
        let _ = writeln!(
            body,
            "<tr data-id=\"{id}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
             <td><a href=\"/Events/Edit/{id}\">Edit</a> \
             <button type=\"button\" class=\"delete-event\" data-id=\"{id}\">Delete</button></td></tr>",
            escape(&event.title),
            iso8601(&event.start_time),
            end,
            escape(&event.location),
            event.guest_capacity,
            event.status,
            id = event.id,
        );
    }

    body.push_str("</tbody>\n</table>\n<script src=\"/static/list.js\"></script>\n");
    layout("All events", "", &body)
}
