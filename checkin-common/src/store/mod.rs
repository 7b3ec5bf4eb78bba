//! Persistence store interface
//!
//! The workflow talks to a narrow trait rather than a concrete backend,
//! so the SQLite store and the in-memory demo store are interchangeable
//! at startup and tests can observe exactly which writes occurred.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::model::{Checkin, CheckinSummary, ChecklistData, Installer, NewInstaller};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Persistence operations consumed by the check-in workflow
///
/// Writes carry no retry or transaction semantics beyond the single
/// call: intake issues two independent inserts, and a failure of the
/// second does not roll back the first.
#[async_trait]
pub trait Store: Send + Sync {
    /// Create an installer record, returning it with its assigned id
    async fn insert_installer(&self, new: NewInstaller) -> Result<Installer>;

    /// Create a check-in record (id is client-generated)
    async fn insert_checkin(&self, checkin: &Checkin) -> Result<()>;

    /// Persist the checklist state map without changing status.
    /// Only valid while the check-in is `in_progress`.
    async fn update_checklist(&self, checkin_id: &str, data: &ChecklistData) -> Result<()>;

    /// Finalize: set status `completed`, stamp the completion time, and
    /// persist the full state map. Only valid from `in_progress`.
    async fn complete_checkin(
        &self,
        checkin_id: &str,
        completion_time: DateTime<Utc>,
        data: &ChecklistData,
    ) -> Result<()>;

    /// Fetch one check-in by id
    async fn fetch_checkin(&self, checkin_id: &str) -> Result<Option<Checkin>>;

    /// All check-ins joined with installer details, newest first
    async fn list_checkins(&self) -> Result<Vec<CheckinSummary>>;
}
