//! checkin-notify library - completion email function
//!
//! Accepts the completion payload from checkin-web, renders the HTML
//! summary, and hands it to the configured mail backend. The caller
//! treats delivery as best-effort; this service still reports failures
//! honestly in its response body.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use checkin_common::notify::CompletionPayload;

pub mod mailer;
pub mod render;

use mailer::{EmailMessage, Mailer};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct NotifyState {
    pub mailer: Arc<dyn Mailer>,
    pub from_address: String,
    /// Fallback recipient when the payload has no installer email
    pub admin_email: String,
}

impl NotifyState {
    pub fn new(mailer: Arc<dyn Mailer>, from_address: String, admin_email: String) -> Self {
        Self {
            mailer,
            from_address,
            admin_email,
        }
    }
}

/// Build application router
pub fn build_router(state: NotifyState) -> Router {
    Router::new()
        .route("/functions/send-completion-email", post(send_completion_email))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "checkin-notify".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Pick the recipient: installer email, or the admin fallback when the
/// payload carries none
pub fn recipient_for(payload: &CompletionPayload, admin_email: &str) -> String {
    let email = payload.installer_data.email.trim();
    if email.is_empty() {
        admin_email.to_string()
    } else {
        email.to_string()
    }
}

/// POST /functions/send-completion-email
pub async fn send_completion_email(
    State(state): State<NotifyState>,
    Json(payload): Json<CompletionPayload>,
) -> Response {
    let stats = render::completion_stats(&payload);
    let message = EmailMessage {
        from: state.from_address.clone(),
        to: recipient_for(&payload, &state.admin_email),
        subject: render::subject(&payload),
        html: render::completion_email(&payload),
    };

    match state.mailer.send(&message).await {
        Ok(()) => {
            info!(
                "Completion email for {} sent to {} ({}/{} items, {}%)",
                payload.checkin_id, message.to, stats.completed, stats.total, stats.percent
            );
            (
                StatusCode::OK,
                Json(json!({ "success": true, "message": "Email sent successfully" })),
            )
                .into_response()
        }
        Err(e) => {
            error!("Completion email for {} failed: {}", payload.checkin_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
