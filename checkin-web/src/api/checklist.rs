//! Checklist execution endpoints
//!
//! All item mutation applies to the in-memory flow only; persistence
//! happens on the explicit save and finalize actions. Every handler
//! locks the session map for the duration of the action, which keeps
//! persistence calls for one check-in strictly sequential.

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::MutexGuard;
use tracing::info;

use checkin_common::lifecycle::CheckinFlow;
use checkin_common::model::ItemState;
use checkin_common::progress::ProgressSummary;
use checkin_common::Error;

use super::{ApiError, ApiResult};
use crate::AppState;

fn flow_mut<'a>(
    sessions: &'a mut MutexGuard<'_, std::collections::HashMap<String, CheckinFlow>>,
    checkin_id: &str,
) -> Result<&'a mut CheckinFlow, ApiError> {
    sessions
        .get_mut(checkin_id)
        .ok_or_else(|| ApiError(Error::NotFound(format!("active check-in {}", checkin_id))))
}

#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub item_id: String,
    pub state: ItemState,
    pub progress: ProgressSummary,
}

fn item_response(flow: &CheckinFlow, item_id: &str) -> ItemResponse {
    ItemResponse {
        item_id: item_id.to_string(),
        state: flow.item_state(item_id).cloned().unwrap_or_default(),
        progress: flow.progress(),
    }
}

/// POST /api/checkins/:id/items/:item_id/toggle
pub async fn toggle_item(
    State(state): State<AppState>,
    Path((checkin_id, item_id)): Path<(String, String)>,
) -> ApiResult<Json<ItemResponse>> {
    let mut sessions = state.sessions.lock().await;
    let flow = flow_mut(&mut sessions, &checkin_id)?;
    flow.toggle_item(&item_id)?;
    Ok(Json(item_response(flow, &item_id)))
}

#[derive(Debug, Deserialize)]
pub struct NotesRequest {
    pub notes: String,
}

/// PUT /api/checkins/:id/items/:item_id/notes
pub async fn set_item_notes(
    State(state): State<AppState>,
    Path((checkin_id, item_id)): Path<(String, String)>,
    Json(body): Json<NotesRequest>,
) -> ApiResult<Json<ItemResponse>> {
    let mut sessions = state.sessions.lock().await;
    let flow = flow_mut(&mut sessions, &checkin_id)?;
    flow.set_item_notes(&item_id, body.notes)?;
    Ok(Json(item_response(flow, &item_id)))
}

#[derive(Debug, Deserialize)]
pub struct MediaRequest {
    /// Storage reference for the uploaded file
    pub reference: String,
}

/// POST /api/checkins/:id/items/:item_id/photos
pub async fn attach_photo(
    State(state): State<AppState>,
    Path((checkin_id, item_id)): Path<(String, String)>,
    Json(body): Json<MediaRequest>,
) -> ApiResult<Json<ItemResponse>> {
    let mut sessions = state.sessions.lock().await;
    let flow = flow_mut(&mut sessions, &checkin_id)?;
    flow.attach_photo(&item_id, body.reference)?;
    Ok(Json(item_response(flow, &item_id)))
}

/// POST /api/checkins/:id/items/:item_id/videos
pub async fn attach_video(
    State(state): State<AppState>,
    Path((checkin_id, item_id)): Path<(String, String)>,
    Json(body): Json<MediaRequest>,
) -> ApiResult<Json<ItemResponse>> {
    let mut sessions = state.sessions.lock().await;
    let flow = flow_mut(&mut sessions, &checkin_id)?;
    flow.attach_video(&item_id, body.reference)?;
    Ok(Json(item_response(flow, &item_id)))
}

#[derive(Debug, Deserialize)]
pub struct SignatureRequest {
    pub signature: String,
    /// Optional correction of the installer name snapshot
    pub installer_name: Option<String>,
}

/// POST /api/checkins/:id/items/:item_id/signature
pub async fn capture_signature(
    State(state): State<AppState>,
    Path((checkin_id, item_id)): Path<(String, String)>,
    Json(body): Json<SignatureRequest>,
) -> ApiResult<Json<ItemResponse>> {
    let mut sessions = state.sessions.lock().await;
    let flow = flow_mut(&mut sessions, &checkin_id)?;
    if let Some(name) = body.installer_name {
        flow.set_installer_name(name);
    }
    flow.begin_signature(&item_id)?;
    flow.apply_signature(body.signature)?;
    Ok(Json(item_response(flow, &item_id)))
}

/// POST /api/checkins/:id/save
pub async fn save_progress(
    State(state): State<AppState>,
    Path(checkin_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let mut sessions = state.sessions.lock().await;
    let flow = flow_mut(&mut sessions, &checkin_id)?;
    flow.save(state.store.as_ref()).await?;
    info!("Check-in {} progress saved", checkin_id);
    Ok(Json(json!({ "saved": true, "progress": flow.progress() })))
}

#[derive(Debug, Serialize)]
pub struct FinalizeResponse {
    pub checkin_id: String,
    pub status: &'static str,
    pub completion_time: DateTime<Utc>,
}

/// POST /api/checkins/:id/finalize
pub async fn finalize_checkin(
    State(state): State<AppState>,
    Path(checkin_id): Path<String>,
) -> ApiResult<Json<FinalizeResponse>> {
    let mut sessions = state.sessions.lock().await;
    let flow = flow_mut(&mut sessions, &checkin_id)?;
    let completion_time = flow
        .finalize(state.store.as_ref(), state.notifier.as_ref())
        .await?;
    info!("Check-in {} completed", checkin_id);
    Ok(Json(FinalizeResponse {
        checkin_id,
        status: "completed",
        completion_time,
    }))
}

/// GET /api/checkins/:id/progress
pub async fn get_progress(
    State(state): State<AppState>,
    Path(checkin_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let mut sessions = state.sessions.lock().await;
    let flow = flow_mut(&mut sessions, &checkin_id)?;
    Ok(Json(json!({
        "checkin_id": checkin_id,
        "progress": flow.progress(),
        "items": flow.checklist(),
    })))
}
