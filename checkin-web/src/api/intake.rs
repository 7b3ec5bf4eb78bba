//! Intake endpoint: installer, location, and project details in one
//! submission
//!
//! Walks the three typed intake steps in order, so a failure in any
//! section surfaces that section's field errors without touching the
//! store. On success the new flow is held in the session map keyed by
//! its check-in id.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::info;

use checkin_common::lifecycle::CheckinFlow;
use checkin_common::model::IntakeForm;

use super::ApiResult;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct CreateCheckinResponse {
    pub checkin_id: String,
    pub status: &'static str,
}

/// POST /api/checkins
pub async fn create_checkin(
    State(state): State<AppState>,
    Json(form): Json<IntakeForm>,
) -> ApiResult<Json<CreateCheckinResponse>> {
    let mut flow = CheckinFlow::new();
    let checkin_id = flow.submit_intake(form, state.store.as_ref()).await?;

    info!("Check-in {} created", checkin_id);
    state.sessions.lock().await.insert(checkin_id.clone(), flow);

    Ok(Json(CreateCheckinResponse {
        checkin_id,
        status: "in_progress",
    }))
}
