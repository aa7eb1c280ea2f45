use axum::body::Body;
use axum::http::{HeaderName, Request};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer, Config};
use crate::handlers::{events, health_check};
use crate::state::AppState;

const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn create_routes(state: AppState, config: &Config) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .route("/health", get(health_check))
        .route("/static/calendar.js", get(events::calendar_script))
        .route("/static/list.js", get(events::list_script))
        .route("/Events", get(events::index))
        .route("/Events/GetEvents", get(events::get_events))
        .route(
            "/Events/Create",
            get(events::create_form).post(events::create),
        )
        .route(
            "/Events/Edit/:id",
            get(events::edit_form).post(events::edit),
        )
        .route("/Events/List", get(events::list))
        .route("/Events/Delete/:id", post(events::delete))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(create_security_headers_layer(config.is_production))
        .layer(create_cors_layer(&config.allowed_origins))
}
