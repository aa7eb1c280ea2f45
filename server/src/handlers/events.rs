use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde::Deserialize;

use crate::models::EventForm;
use crate::services::calendar::{to_calendar_items, CalendarItem};
use crate::services::events::{self, Submission};
use crate::services::listing::{self, SortOrder};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{empty_success, page, see_other};
use crate::views::{self, FormMode};

const CALENDAR_JS: &str = include_str!("../../static/calendar.js");
const LIST_JS: &str = include_str!("../../static/list.js");
const INDEX_PATH: &str = "/Events";

#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateQuery {
    pub start: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub sort_order: Option<String>,
}

/// GET /Events
pub async fn index() -> Response {
    page(StatusCode::OK, views::calendar_page())
}

fn script(source: &'static str) -> Response {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        source,
    )
        .into_response()
}

/// GET /static/calendar.js
pub async fn calendar_script() -> Response {
    script(CALENDAR_JS)
}

/// GET /static/list.js
pub async fn list_script() -> Response {
    script(LIST_JS)
}

/// Ids that are not integers name no event.
fn parse_event_id(raw: &str) -> Result<i32, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("Event with id '{}' was not found", raw)))
}

/// GET /Events/GetEvents
pub async fn get_events(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<CalendarItem>>, AppError> {
    let events = listing::feed(state.store.all().await?, query.status.as_deref());
    tracing::debug!(count = events.len(), status = ?query.status, "Serving calendar feed");
    Ok(Json(to_calendar_items(&events)))
}

/// GET /Events/Create
pub async fn create_form(Query(query): Query<CreateQuery>) -> Response {
    let form = EventForm::prefilled(query.start.as_deref());
    page(
        StatusCode::OK,
        views::event_form_page(FormMode::Create, &form, None),
    )
}

/// POST /Events/Create
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<EventForm>,
) -> Result<Response, AppError> {
    match events::create_event(state.store.as_ref(), &form).await? {
        Submission::Saved(_) => Ok(see_other(INDEX_PATH)),
        Submission::Invalid(errors) => {
            tracing::debug!(errors = %errors, "Rejected event submission");
            Ok(page(
                StatusCode::UNPROCESSABLE_ENTITY,
                views::event_form_page(FormMode::Create, &form, Some(&errors)),
            ))
        }
    }
}

/// GET /Events/Edit/{id}
pub async fn edit_form(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_event_id(&raw_id)?;
    let event = state.store.get(id).await?;
    let form = EventForm::from_event(&event);
    Ok(page(
        StatusCode::OK,
        views::event_form_page(FormMode::Edit(id), &form, None),
    ))
}

/// POST /Events/Edit/{id}
pub async fn edit(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Form(form): Form<EventForm>,
) -> Result<Response, AppError> {
    let id = parse_event_id(&raw_id)?;
    match events::update_event(state.store.as_ref(), id, &form).await? {
        Submission::Saved(_) => Ok(see_other(INDEX_PATH)),
        Submission::Invalid(errors) => {
            tracing::debug!(event_id = id, errors = %errors, "Rejected event edit");
            Ok(page(
                StatusCode::UNPROCESSABLE_ENTITY,
                views::event_form_page(FormMode::Edit(id), &form, Some(&errors)),
            ))
        }
    }
}

/// GET /Events/List
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, AppError> {
    let order = SortOrder::from_param(query.sort_order.as_deref());
    let events = listing::list(state.store.all().await?, order);
    Ok(page(StatusCode::OK, views::event_list_page(&events, order)))
}

/// POST /Events/Delete/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_event_id(&raw_id)?;
    events::delete_event(state.store.as_ref(), id).await?;
    Ok(empty_success("Event deleted").into_response())
}
