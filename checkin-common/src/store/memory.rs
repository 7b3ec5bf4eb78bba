//! In-memory store
//!
//! Second concrete implementation of the store interface, selected by
//! the `demo_mode` configuration flag. Lets the services run without a
//! database file, and doubles as the test fake: tests can inspect the
//! exact records the workflow wrote.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::{
    Checkin, CheckinStatus, CheckinSummary, ChecklistData, Installer, NewInstaller,
};
use crate::progress;
use crate::store::Store;

/// Store backed by process memory; contents vanish on shutdown
#[derive(Default)]
pub struct MemoryStore {
    installers: RwLock<Vec<Installer>>,
    checkins: RwLock<Vec<Checkin>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all installer records (test observation)
    pub async fn installers(&self) -> Vec<Installer> {
        self.installers.read().await.clone()
    }

    /// Snapshot of all check-in records (test observation)
    pub async fn checkins(&self) -> Vec<Checkin> {
        self.checkins.read().await.clone()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_installer(&self, new: NewInstaller) -> Result<Installer> {
        let installer = Installer {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            phone: new.phone,
            company: new.company,
            created_at: Utc::now(),
        };
        self.installers.write().await.push(installer.clone());
        Ok(installer)
    }

    async fn insert_checkin(&self, checkin: &Checkin) -> Result<()> {
        let mut checkins = self.checkins.write().await;
        if checkins.iter().any(|c| c.id == checkin.id) {
            return Err(Error::Internal(format!(
                "duplicate check-in id {}",
                checkin.id
            )));
        }
        checkins.push(checkin.clone());
        Ok(())
    }

    async fn update_checklist(&self, checkin_id: &str, data: &ChecklistData) -> Result<()> {
        let mut checkins = self.checkins.write().await;
        let checkin = checkins
            .iter_mut()
            .find(|c| c.id == checkin_id)
            .ok_or_else(|| Error::NotFound(format!("check-in {}", checkin_id)))?;
        if checkin.status != CheckinStatus::InProgress {
            return Err(Error::InvalidTransition {
                stage: checkin.status.as_str(),
                action: "save checklist progress",
            });
        }
        checkin.checklist_data = data.clone();
        Ok(())
    }

    async fn complete_checkin(
        &self,
        checkin_id: &str,
        completion_time: DateTime<Utc>,
        data: &ChecklistData,
    ) -> Result<()> {
        let mut checkins = self.checkins.write().await;
        let checkin = checkins
            .iter_mut()
            .find(|c| c.id == checkin_id)
            .ok_or_else(|| Error::NotFound(format!("check-in {}", checkin_id)))?;
        if !checkin.status.can_transition_to(CheckinStatus::Completed) {
            return Err(Error::InvalidTransition {
                stage: checkin.status.as_str(),
                action: "complete the check-in",
            });
        }
        checkin.status = CheckinStatus::Completed;
        checkin.completion_time = Some(completion_time);
        checkin.checklist_data = data.clone();
        Ok(())
    }

    async fn fetch_checkin(&self, checkin_id: &str) -> Result<Option<Checkin>> {
        let checkins = self.checkins.read().await;
        Ok(checkins.iter().find(|c| c.id == checkin_id).cloned())
    }

    async fn list_checkins(&self) -> Result<Vec<CheckinSummary>> {
        let checkins = self.checkins.read().await;
        let installers = self.installers.read().await;
        let mut rows: Vec<CheckinSummary> = checkins
            .iter()
            .map(|c| {
                let installer = installers.iter().find(|i| i.id == c.installer_id);
                let completed = progress::completed_count(&c.checklist_data);
                let total = crate::catalog::CATALOG_SIZE;
                CheckinSummary {
                    id: c.id.clone(),
                    project_name: c.project_name.clone(),
                    location: c.location.clone(),
                    status: c.status,
                    status_color: c.status.color(),
                    checkin_time: c.checkin_time,
                    completion_time: c.completion_time,
                    created_at: c.created_at,
                    installer_name: installer.map(|i| i.name.clone()).unwrap_or_default(),
                    installer_company: installer.map(|i| i.company.clone()).unwrap_or_default(),
                    installer_email: installer.map(|i| i.email.clone()).unwrap_or_default(),
                    completed_items: completed,
                    total_items: total,
                    progress_percent: progress::progress_percent(completed, total),
                }
            })
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}
