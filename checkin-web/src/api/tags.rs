//! Completion tag / certificate endpoint
//!
//! Print data is derived from the live flow, so reaching this endpoint
//! without a completed check-in in the session is the routing error the
//! 404 hint steers back to intake.

use axum::extract::{Path, State};
use axum::Json;

use checkin_common::fmt::format_date;
use checkin_common::lifecycle::CompletionTag;
use checkin_common::Error;
use serde::Serialize;

use super::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct TagsResponse {
    #[serde(flatten)]
    pub tag: CompletionTag,
    /// Pre-formatted timestamps for the printed certificate
    pub checkin_display: String,
    pub completion_display: String,
}

/// GET /api/checkins/:id/tags
pub async fn get_tags(
    State(state): State<AppState>,
    Path(checkin_id): Path<String>,
) -> ApiResult<Json<TagsResponse>> {
    let sessions = state.sessions.lock().await;
    let flow = sessions
        .get(&checkin_id)
        .ok_or_else(|| ApiError(Error::NotFound(format!("active check-in {}", checkin_id))))?;
    let tag = flow.tag_data()?;
    let checkin_display = format_date(tag.checkin_time);
    let completion_display = format_date(tag.completion_time);
    Ok(Json(TagsResponse {
        tag,
        checkin_display,
        completion_display,
    }))
}
