//! Dashboard and catalog endpoints

use axum::extract::{Query, State};
use axum::Json;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use checkin_common::catalog::CATALOG;
use checkin_common::model::{CheckinStatus, CheckinSummary};

use super::ApiResult;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// Case-insensitive match on project, installer, or company
    pub search: Option<String>,
    /// `all` (default), `in_progress`, `completed`, `cancelled`
    pub status: Option<String>,
    /// `all` (default), `today`, `week`, `month`
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub total_checkins: usize,
    pub completed_checkins: usize,
    pub in_progress_checkins: usize,
    /// Percentage of all check-ins that reached completion
    pub completion_rate: u8,
    pub checkins: Vec<CheckinSummary>,
}

fn matches_search(row: &CheckinSummary, term: &str) -> bool {
    let term = term.to_lowercase();
    row.project_name.to_lowercase().contains(&term)
        || row.installer_name.to_lowercase().contains(&term)
        || row.installer_company.to_lowercase().contains(&term)
}

fn matches_date(row: &CheckinSummary, filter: &str) -> bool {
    let now = Utc::now();
    match filter {
        "today" => row.created_at.date_naive() == now.date_naive(),
        "week" => row.created_at > now - Duration::days(7),
        "month" => row.created_at > now - Duration::days(30),
        _ => true,
    }
}

/// GET /api/dashboard
///
/// Statistics are computed over all check-ins; the search/status/date
/// filters narrow only the returned list.
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<Json<DashboardResponse>> {
    let rows = state.store.list_checkins().await?;

    let total = rows.len();
    let completed = rows
        .iter()
        .filter(|r| r.status == CheckinStatus::Completed)
        .count();
    let in_progress = rows
        .iter()
        .filter(|r| r.status == CheckinStatus::InProgress)
        .count();
    let completion_rate = checkin_common::progress::progress_percent(completed, total);

    let checkins: Vec<CheckinSummary> = rows
        .into_iter()
        .filter(|row| match query.search.as_deref() {
            Some(term) if !term.is_empty() => matches_search(row, term),
            _ => true,
        })
        .filter(|row| match query.status.as_deref() {
            Some("all") | None => true,
            Some(status) => row.status.as_str() == status,
        })
        .filter(|row| matches_date(row, query.date.as_deref().unwrap_or("all")))
        .collect();

    Ok(Json(DashboardResponse {
        total_checkins: total,
        completed_checkins: completed,
        in_progress_checkins: in_progress,
        completion_rate,
        checkins,
    }))
}

#[derive(Debug, Serialize)]
pub struct CatalogEntry {
    pub id: &'static str,
    pub item_name: &'static str,
    pub category: &'static str,
    pub is_required: bool,
    pub description: &'static str,
    pub sort_order: u32,
}

/// GET /api/checklist-items
///
/// The embedded catalog, for clients rendering the checklist.
pub async fn get_catalog() -> Json<Vec<CatalogEntry>> {
    Json(
        CATALOG
            .iter()
            .map(|item| CatalogEntry {
                id: item.id,
                item_name: item.name,
                category: item.category,
                is_required: item.required,
                description: item.description,
                sort_order: item.sort_order,
            })
            .collect(),
    )
}
