//! Completion notification contract
//!
//! The notification is best-effort by design: the finalize transition
//! never blocks on it and never reverses because of it. Callers log and
//! swallow delivery failures.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::model::{ChecklistData, InstallerForm, ProjectForm};

/// Payload sent to the completion-email function.
///
/// Wire field names are camelCase; this is the contract the notify
/// service accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionPayload {
    pub checkin_id: String,
    pub installer_data: InstallerForm,
    pub project_data: ProjectForm,
    pub checklist_data: ChecklistData,
}

/// Delivery interface for the completion notification
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_completion(&self, payload: &CompletionPayload) -> Result<()>;
}

/// Notifier that only logs; used when no notify endpoint is configured
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn send_completion(&self, payload: &CompletionPayload) -> Result<()> {
        info!(
            "Completion notification for {} dropped (no notify endpoint configured)",
            payload.checkin_id
        );
        Ok(())
    }
}
