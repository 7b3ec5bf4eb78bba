//! HTTP API handlers

mod checklist;
mod dashboard;
mod health;
mod intake;
mod tags;

pub use checklist::{
    attach_photo, attach_video, capture_signature, finalize_checkin, get_progress,
    save_progress, set_item_notes, toggle_item,
};
pub use dashboard::{get_catalog, get_dashboard};
pub use health::health_routes;
pub use intake::create_checkin;
pub use tags::get_tags;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use checkin_common::Error;

/// Maps workflow errors onto HTTP responses:
/// - validation failures → 422 with per-field messages
/// - missing context → 404 with a pointer back to the intake form
/// - guard/transition violations → 409
/// - everything else → 500, with in-memory state left intact for retry
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            Error::Validation(fields) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": "validation_failed", "fields": fields }),
            ),
            Error::NotFound(what) => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": format!("{} not found", what),
                    "hint": "No check-in data found. Please start from the beginning.",
                }),
            ),
            Error::Incomplete(detail) => (
                StatusCode::CONFLICT,
                json!({
                    "error": "checklist_incomplete",
                    "detail": format!(
                        "All required items must be completed before finishing the installation ({})",
                        detail
                    ),
                }),
            ),
            Error::InvalidTransition { stage, action } => (
                StatusCode::CONFLICT,
                json!({
                    "error": "invalid_transition",
                    "detail": format!("Cannot {} while in the {} stage", action, stage),
                }),
            ),
            other => {
                tracing::error!("Request failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": other.to_string() }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Shorthand for handler results
pub type ApiResult<T> = std::result::Result<T, ApiError>;
