//! Checklist progress tracker
//!
//! Pure derivations over the per-item state map. Nothing here mutates
//! the map; toggling and annotation live in the lifecycle state machine.

use serde::Serialize;

use crate::catalog::{CatalogItem, CATALOG, CATALOG_SIZE};
use crate::model::ChecklistData;

/// Count of items currently flagged complete
pub fn completed_count(data: &ChecklistData) -> usize {
    data.values().filter(|s| s.completed).count()
}

/// Rounded completion percentage
pub fn progress_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u8
}

/// True when every required catalog item is complete. Items not flagged
/// required never block finalization regardless of their state.
pub fn ready_to_finalize(data: &ChecklistData) -> bool {
    ready_to_finalize_for(&CATALOG, data)
}

/// Same gate evaluated against an arbitrary catalog slice
pub fn ready_to_finalize_for(catalog: &[CatalogItem], data: &ChecklistData) -> bool {
    catalog
        .iter()
        .filter(|item| item.required)
        .all(|item| data.get(item.id).map(|s| s.completed).unwrap_or(false))
}

/// Aggregate progress figures for one check-in
#[derive(Debug, Clone, Serialize)]
pub struct ProgressSummary {
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
    pub ready_to_finalize: bool,
}

/// Derive the aggregate figures from a state map
pub fn summarize(data: &ChecklistData) -> ProgressSummary {
    let completed = completed_count(data);
    ProgressSummary {
        completed,
        total: CATALOG_SIZE,
        percent: progress_percent(completed, CATALOG_SIZE),
        ready_to_finalize: ready_to_finalize(data),
    }
}
