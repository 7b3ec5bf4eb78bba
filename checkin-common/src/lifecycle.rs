//! Check-in lifecycle state machine
//!
//! Governs the three ordered stages of the installer workflow:
//! intake (three typed steps) → checklist execution → completion. The
//! stage enum is the transition table: every action names the stage it
//! requires, and calling it anywhere else is an `InvalidTransition`
//! error rather than a silent misstep.
//!
//! All checklist mutation is applied to the in-memory snapshot only;
//! nothing reaches the store except the explicit save and finalize
//! actions.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::error::{Error, Result};
use crate::model::{
    empty_checklist, Checkin, CheckinStatus, ChecklistData, Installer, InstallerForm,
    IntakeForm, LocationForm, NewInstaller, ProjectForm,
};
use crate::notify::{CompletionPayload, Notifier};
use crate::store::Store;
use crate::{catalog, ids, progress};

/// Ordered intake steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeStep {
    Installer,
    Location,
    Project,
}

/// Workflow stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Intake(IntakeStep),
    ChecklistInProgress,
    Completed,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Intake(IntakeStep::Installer) => "intake (installer details)",
            Stage::Intake(IntakeStep::Location) => "intake (location details)",
            Stage::Intake(IntakeStep::Project) => "intake (project details)",
            Stage::ChecklistInProgress => "checklist",
            Stage::Completed => "completed",
        }
    }
}

/// Certificate/print-tag data derived from a completed check-in
#[derive(Debug, Clone, Serialize)]
pub struct CompletionTag {
    pub checkin_id: String,
    pub installer_name: String,
    pub installer_company: String,
    pub project_name: String,
    pub client_name: String,
    pub location: String,
    pub checkin_time: DateTime<Utc>,
    pub completion_time: DateTime<Utc>,
    pub completed_items: usize,
    pub total_items: usize,
    pub completion_percent: u8,
    /// JSON payload to encode into the printed QR code
    pub qr_data: String,
}

/// One installer's pass through the workflow, from intake to completion
pub struct CheckinFlow {
    stage: Stage,
    installer_form: Option<InstallerForm>,
    location_form: Option<LocationForm>,
    project_form: Option<ProjectForm>,
    installer: Option<Installer>,
    checkin_id: Option<String>,
    checkin_time: Option<DateTime<Utc>>,
    completion_time: Option<DateTime<Utc>>,
    checklist: ChecklistData,
    /// Name snapshotted onto items as they complete; editable from the
    /// signature dialog
    installer_name: String,
    /// Single in-flight signature capture target
    signature_target: Option<String>,
}

impl CheckinFlow {
    pub fn new() -> Self {
        Self {
            stage: Stage::Intake(IntakeStep::Installer),
            installer_form: None,
            location_form: None,
            project_form: None,
            installer: None,
            checkin_id: None,
            checkin_time: None,
            completion_time: None,
            checklist: empty_checklist(),
            installer_name: String::new(),
            signature_target: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn checkin_id(&self) -> Option<&str> {
        self.checkin_id.as_deref()
    }

    pub fn checklist(&self) -> &ChecklistData {
        &self.checklist
    }

    pub fn item_state(&self, item_id: &str) -> Option<&crate::model::ItemState> {
        self.checklist.get(item_id)
    }

    pub fn progress(&self) -> progress::ProgressSummary {
        progress::summarize(&self.checklist)
    }

    fn expect_stage(&self, want: Stage, action: &'static str) -> Result<()> {
        if self.stage == want {
            Ok(())
        } else {
            Err(Error::InvalidTransition {
                stage: self.stage.name(),
                action,
            })
        }
    }

    fn require_checkin_id(&self) -> Result<&str> {
        self.checkin_id
            .as_deref()
            .ok_or_else(|| Error::Internal("no check-in id outside the intake stage".into()))
    }

    // ---- Intake ---------------------------------------------------------

    /// Installer step: validate and advance to the location step
    pub fn submit_installer(&mut self, form: InstallerForm) -> Result<()> {
        self.expect_stage(
            Stage::Intake(IntakeStep::Installer),
            "submit installer details",
        )?;
        let errors = form.validate();
        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }
        self.installer_name = form.name.trim().to_string();
        self.installer_form = Some(form);
        self.stage = Stage::Intake(IntakeStep::Location);
        Ok(())
    }

    /// Location step: validate and advance to the project step
    pub fn submit_location(&mut self, form: LocationForm) -> Result<()> {
        self.expect_stage(
            Stage::Intake(IntakeStep::Location),
            "submit location details",
        )?;
        let errors = form.validate();
        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }
        self.location_form = Some(form);
        self.stage = Stage::Intake(IntakeStep::Project);
        Ok(())
    }

    /// Project step: validate, persist installer then check-in, and
    /// advance to checklist execution.
    ///
    /// The two inserts are independent; if the check-in insert fails
    /// after the installer insert succeeded, the installer record is not
    /// removed and the flow stays in the project step for a retry.
    pub async fn submit_project(&mut self, form: ProjectForm, store: &dyn Store) -> Result<String> {
        self.expect_stage(Stage::Intake(IntakeStep::Project), "submit project details")?;
        let errors = form.validate();
        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }

        let installer_form = self
            .installer_form
            .clone()
            .ok_or_else(|| Error::Internal("installer step missing at project submit".into()))?;
        let location_form = self
            .location_form
            .clone()
            .ok_or_else(|| Error::Internal("location step missing at project submit".into()))?;

        let installer = store
            .insert_installer(NewInstaller {
                name: installer_form.name.trim().to_string(),
                email: installer_form.email.trim().to_string(),
                phone: installer_form.phone.trim().to_string(),
                company: installer_form.company.trim().to_string(),
            })
            .await?;

        let checkin_id = ids::generate_checkin_id();
        let checkin_time = Utc::now();
        let description = form.description.trim();
        let checkin = Checkin {
            id: checkin_id.clone(),
            installer_id: installer.id,
            location: location_form.denormalized(),
            project_name: form.name.trim().to_string(),
            checkin_time,
            completion_time: None,
            status: CheckinStatus::InProgress,
            checklist_data: self.checklist.clone(),
            notes: if description.is_empty() {
                None
            } else {
                Some(description.to_string())
            },
            created_at: checkin_time,
        };
        store.insert_checkin(&checkin).await?;

        self.installer = Some(installer);
        self.project_form = Some(form);
        self.checkin_id = Some(checkin_id.clone());
        self.checkin_time = Some(checkin_time);
        self.stage = Stage::ChecklistInProgress;
        Ok(checkin_id)
    }

    /// Convenience wrapper walking all three intake steps in order
    pub async fn submit_intake(&mut self, form: IntakeForm, store: &dyn Store) -> Result<String> {
        self.submit_installer(form.installer)?;
        self.submit_location(form.location)?;
        self.submit_project(form.project, store).await
    }

    // ---- Checklist execution --------------------------------------------

    /// Flip an item's completion flag. Completing stamps the timestamp
    /// and snapshots the installer name; un-completing clears the
    /// timestamp but keeps media and notes.
    pub fn toggle_item(&mut self, item_id: &str) -> Result<bool> {
        self.expect_stage(Stage::ChecklistInProgress, "toggle a checklist item")?;
        let name = self.installer_name.clone();
        let state = self.item_state_mut(item_id)?;
        state.completed = !state.completed;
        if state.completed {
            state.completed_at = Some(Utc::now());
            state.installer_name = Some(name);
        } else {
            state.completed_at = None;
        }
        Ok(state.completed)
    }

    /// Replace an item's free-text notes
    pub fn set_item_notes(&mut self, item_id: &str, notes: String) -> Result<()> {
        self.expect_stage(Stage::ChecklistInProgress, "edit checklist notes")?;
        self.item_state_mut(item_id)?.notes = notes;
        Ok(())
    }

    /// Append a photo reference; never replaces or deduplicates
    pub fn attach_photo(&mut self, item_id: &str, reference: String) -> Result<()> {
        self.expect_stage(Stage::ChecklistInProgress, "attach a photo")?;
        self.item_state_mut(item_id)?.photos.push(reference);
        Ok(())
    }

    /// Append a video reference; never replaces or deduplicates
    pub fn attach_video(&mut self, item_id: &str, reference: String) -> Result<()> {
        self.expect_stage(Stage::ChecklistInProgress, "attach a video")?;
        self.item_state_mut(item_id)?.videos.push(reference);
        Ok(())
    }

    /// Point the single signature-capture slot at an item. Starting a
    /// new capture replaces any previous target.
    pub fn begin_signature(&mut self, item_id: &str) -> Result<()> {
        self.expect_stage(Stage::ChecklistInProgress, "capture a signature")?;
        if catalog::item(item_id).is_none() {
            return Err(Error::NotFound(format!("checklist item {}", item_id)));
        }
        self.signature_target = Some(item_id.to_string());
        Ok(())
    }

    /// Abandon the in-flight signature capture
    pub fn cancel_signature(&mut self) {
        self.signature_target = None;
    }

    /// Store the captured signature on the current target item and clear
    /// the slot. Returns the item id the signature landed on.
    pub fn apply_signature(&mut self, signature: String) -> Result<String> {
        self.expect_stage(Stage::ChecklistInProgress, "capture a signature")?;
        let item_id = self
            .signature_target
            .take()
            .ok_or_else(|| Error::Internal("no signature capture in progress".into()))?;
        self.item_state_mut(&item_id)?.signature = Some(signature);
        Ok(item_id)
    }

    /// Update the installer name used for completion snapshots (editable
    /// from the signature dialog)
    pub fn set_installer_name(&mut self, name: String) {
        self.installer_name = name;
    }

    fn item_state_mut(&mut self, item_id: &str) -> Result<&mut crate::model::ItemState> {
        if catalog::item(item_id).is_none() {
            return Err(Error::NotFound(format!("checklist item {}", item_id)));
        }
        Ok(self.checklist.entry(item_id.to_string()).or_default())
    }

    // ---- Persistence actions --------------------------------------------

    /// Persist the current checklist snapshot without changing status.
    /// Idempotent; callable any number of times.
    pub async fn save(&self, store: &dyn Store) -> Result<()> {
        self.expect_stage(Stage::ChecklistInProgress, "save checklist progress")?;
        let checkin_id = self.require_checkin_id()?;
        store.update_checklist(checkin_id, &self.checklist).await
    }

    /// Finalize the check-in: guard on required-item completion, persist
    /// the terminal state, then fire the best-effort notification.
    /// Notification failure is logged and swallowed; it never blocks or
    /// reverses the transition.
    pub async fn finalize(
        &mut self,
        store: &dyn Store,
        notifier: &dyn Notifier,
    ) -> Result<DateTime<Utc>> {
        self.expect_stage(Stage::ChecklistInProgress, "complete the installation")?;
        let summary = self.progress();
        if !summary.ready_to_finalize {
            return Err(Error::Incomplete(format!(
                "{} of {} required items complete",
                summary.completed, summary.total
            )));
        }

        let checkin_id = self.require_checkin_id()?.to_string();
        let completion_time = Utc::now();
        store
            .complete_checkin(&checkin_id, completion_time, &self.checklist)
            .await?;
        self.completion_time = Some(completion_time);
        self.stage = Stage::Completed;

        match self.completion_payload() {
            Ok(payload) => {
                if let Err(e) = notifier.send_completion(&payload).await {
                    warn!("Completion notification for {} failed: {}", checkin_id, e);
                }
            }
            Err(e) => warn!("Could not build completion payload: {}", e),
        }

        Ok(completion_time)
    }

    // ---- Completion views -----------------------------------------------

    /// Payload for the completion-email function
    pub fn completion_payload(&self) -> Result<CompletionPayload> {
        let installer_form = self
            .installer_form
            .clone()
            .ok_or_else(|| Error::Internal("no installer data on this flow".into()))?;
        let project_form = self
            .project_form
            .clone()
            .ok_or_else(|| Error::Internal("no project data on this flow".into()))?;
        Ok(CompletionPayload {
            checkin_id: self.require_checkin_id()?.to_string(),
            installer_data: installer_form,
            project_data: project_form,
            checklist_data: self.checklist.clone(),
        })
    }

    /// Certificate/print-tag data; only available once completed
    pub fn tag_data(&self) -> Result<CompletionTag> {
        self.expect_stage(Stage::Completed, "print completion tags")?;
        let checkin_id = self.require_checkin_id()?.to_string();
        let installer = self
            .installer
            .as_ref()
            .ok_or_else(|| Error::Internal("no installer record on this flow".into()))?;
        let project = self
            .project_form
            .as_ref()
            .ok_or_else(|| Error::Internal("no project data on this flow".into()))?;
        let location = self
            .location_form
            .as_ref()
            .map(|l| l.denormalized())
            .unwrap_or_default();
        let summary = self.progress();

        Ok(CompletionTag {
            qr_data: ids::qr_code_data(&checkin_id),
            checkin_id,
            installer_name: installer.name.clone(),
            installer_company: installer.company.clone(),
            project_name: project.name.clone(),
            client_name: project.client.clone(),
            location,
            checkin_time: self
                .checkin_time
                .ok_or_else(|| Error::Internal("no check-in time on this flow".into()))?,
            completion_time: self
                .completion_time
                .ok_or_else(|| Error::Internal("no completion time on this flow".into()))?,
            completed_items: summary.completed,
            total_items: summary.total,
            completion_percent: summary.percent,
        })
    }
}

impl Default for CheckinFlow {
    fn default() -> Self {
        Self::new()
    }
}
