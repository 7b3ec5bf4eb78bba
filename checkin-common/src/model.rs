//! Data model for the check-in workflow

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog;

/// Check-in status
///
/// Transitions are forward-only: `in_progress` may move to `completed`
/// or `cancelled`, both of which are terminal. No workflow transition
/// produces `cancelled`; it exists for administrative writes performed
/// outside this system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckinStatus {
    InProgress,
    Completed,
    Cancelled,
}

impl CheckinStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckinStatus::InProgress => "in_progress",
            CheckinStatus::Completed => "completed",
            CheckinStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "in_progress" => Some(CheckinStatus::InProgress),
            "completed" => Some(CheckinStatus::Completed),
            "cancelled" => Some(CheckinStatus::Cancelled),
            _ => None,
        }
    }

    /// Forward-only transition check
    pub fn can_transition_to(self, next: CheckinStatus) -> bool {
        matches!(
            (self, next),
            (CheckinStatus::InProgress, CheckinStatus::Completed)
                | (CheckinStatus::InProgress, CheckinStatus::Cancelled)
        )
    }

    /// Badge color used by the dashboard
    pub fn color(&self) -> &'static str {
        match self {
            CheckinStatus::Completed => "success",
            CheckinStatus::InProgress => "warning",
            CheckinStatus::Cancelled => "error",
        }
    }
}

/// An installation technician, created once at intake
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Installer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub created_at: DateTime<Utc>,
}

/// Installer fields as collected by the intake form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInstaller {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
}

/// Per-item state within one check-in
///
/// Every field except `completed` is optional in the sense that an item
/// the installer never touched carries the default value. `completed_at`
/// is stamped when the item toggles to complete and cleared when it
/// toggles back; media references and notes survive both directions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemState {
    pub completed: bool,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub videos: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Map of checklist item id to its per-check-in state
pub type ChecklistData = BTreeMap<String, ItemState>;

/// Fresh checklist map with one default entry per catalog item
pub fn empty_checklist() -> ChecklistData {
    catalog::CATALOG
        .iter()
        .map(|item| (item.id.to_string(), ItemState::default()))
        .collect()
}

/// The central aggregate: one installer's record of one installation job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkin {
    /// Client-generated identifier (`CHK-...`), not server-assigned
    pub id: String,
    pub installer_id: Uuid,
    /// Denormalized address string, not a separate record
    pub location: String,
    pub project_name: String,
    pub checkin_time: DateTime<Utc>,
    pub completion_time: Option<DateTime<Utc>>,
    pub status: CheckinStatus,
    pub checklist_data: ChecklistData,
    /// Free-text project description captured at intake
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Installer section of the intake form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstallerForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
}

/// Location section of the intake form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationForm {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl LocationForm {
    /// Single denormalized string stored on the check-in record
    pub fn denormalized(&self) -> String {
        format!(
            "{}, {}, {} {}",
            self.address, self.city, self.state, self.zip
        )
    }
}

/// Project section of the intake form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectForm {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub client: String,
}

/// Complete intake submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeForm {
    pub installer: InstallerForm,
    pub location: LocationForm,
    pub project: ProjectForm,
}

/// Dashboard row: a check-in joined with its installer plus derived
/// progress figures
#[derive(Debug, Clone, Serialize)]
pub struct CheckinSummary {
    pub id: String,
    pub project_name: String,
    pub location: String,
    pub status: CheckinStatus,
    pub status_color: &'static str,
    pub checkin_time: DateTime<Utc>,
    pub completion_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub installer_name: String,
    pub installer_company: String,
    pub installer_email: String,
    pub completed_items: usize,
    pub total_items: usize,
    pub progress_percent: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            CheckinStatus::InProgress,
            CheckinStatus::Completed,
            CheckinStatus::Cancelled,
        ] {
            assert_eq!(CheckinStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(CheckinStatus::parse("unknown"), None);
    }

    #[test]
    fn status_transitions_are_forward_only() {
        use CheckinStatus::*;
        assert!(InProgress.can_transition_to(Completed));
        assert!(InProgress.can_transition_to(Cancelled));
        assert!(!Completed.can_transition_to(InProgress));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(InProgress));
        assert!(!InProgress.can_transition_to(InProgress));
    }

    #[test]
    fn empty_checklist_covers_catalog() {
        let map = empty_checklist();
        assert_eq!(map.len(), crate::catalog::CATALOG_SIZE);
        assert!(map.values().all(|s| !s.completed && s.photos.is_empty()));
    }

    #[test]
    fn location_denormalizes_to_single_string() {
        let loc = LocationForm {
            address: "12 Main St".into(),
            city: "Springfield".into(),
            state: "MA".into(),
            zip: "01101".into(),
        };
        assert_eq!(loc.denormalized(), "12 Main St, Springfield, MA 01101");
    }

    #[test]
    fn untouched_item_state_deserializes_with_defaults() {
        let state: ItemState = serde_json::from_str(r#"{"completed": false}"#).unwrap();
        assert_eq!(state, ItemState::default());
    }
}
