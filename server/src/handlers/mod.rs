use axum::response::{IntoResponse, Response};
use serde::Serialize;

pub mod events;

use crate::utils::response::success;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "sliv-events",
    };

    success(payload, "Health check successful").into_response()
}
