//! SQLite store
//!
//! Schema is created on first connect; startup is zero-config beyond the
//! database path. Checklist state is stored as a JSON column on the
//! check-in row, timestamps as RFC 3339 text.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::{
    Checkin, CheckinStatus, CheckinSummary, ChecklistData, Installer, NewInstaller,
};
use crate::progress;
use crate::store::Store;

/// Store backed by a SQLite database file
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if necessary) the database and ensure the schema
    /// exists
    pub async fn connect(db_path: &Path) -> Result<Self> {
        let newly_created = !db_path.exists();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await?;

        if newly_created {
            info!("Initialized new database: {}", db_path.display());
        } else {
            info!("Opened existing database: {}", db_path.display());
        }

        sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;
        sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;
        sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

        create_installers_table(&pool).await?;
        create_checkins_table(&pool).await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

async fn create_installers_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS installers (
            guid TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            phone TEXT NOT NULL,
            company TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_checkins_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS checkins (
            id TEXT PRIMARY KEY NOT NULL,
            installer_guid TEXT NOT NULL REFERENCES installers(guid),
            location TEXT NOT NULL,
            project_name TEXT NOT NULL,
            checkin_time TEXT NOT NULL,
            completion_time TEXT,
            status TEXT NOT NULL,
            checklist_data TEXT NOT NULL,
            notes TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

fn parse_ts(raw: &str, column: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("invalid timestamp in {}: {}", column, e)))
}

fn parse_status(raw: &str) -> Result<CheckinStatus> {
    CheckinStatus::parse(raw)
        .ok_or_else(|| Error::Internal(format!("unknown check-in status '{}'", raw)))
}

fn decode_checklist(raw: &str) -> Result<ChecklistData> {
    serde_json::from_str(raw)
        .map_err(|e| Error::Internal(format!("corrupt checklist_data column: {}", e)))
}

fn encode_checklist(data: &ChecklistData) -> Result<String> {
    serde_json::to_string(data)
        .map_err(|e| Error::Internal(format!("failed to encode checklist state: {}", e)))
}

fn checkin_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Checkin> {
    let installer_guid: String = row.try_get("installer_guid")?;
    let checkin_time: String = row.try_get("checkin_time")?;
    let completion_time: Option<String> = row.try_get("completion_time")?;
    let status: String = row.try_get("status")?;
    let checklist_data: String = row.try_get("checklist_data")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(Checkin {
        id: row.try_get("id")?,
        installer_id: Uuid::parse_str(&installer_guid)
            .map_err(|e| Error::Internal(format!("invalid installer guid: {}", e)))?,
        location: row.try_get("location")?,
        project_name: row.try_get("project_name")?,
        checkin_time: parse_ts(&checkin_time, "checkin_time")?,
        completion_time: completion_time
            .map(|ts| parse_ts(&ts, "completion_time"))
            .transpose()?,
        status: parse_status(&status)?,
        checklist_data: decode_checklist(&checklist_data)?,
        notes: row.try_get("notes")?,
        created_at: parse_ts(&created_at, "created_at")?,
    })
}

#[async_trait]
impl Store for SqliteStore {
    async fn insert_installer(&self, new: NewInstaller) -> Result<Installer> {
        let installer = Installer {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            phone: new.phone,
            company: new.company,
            created_at: Utc::now(),
        };
        sqlx::query(
            "INSERT INTO installers (guid, name, email, phone, company, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(installer.id.to_string())
        .bind(&installer.name)
        .bind(&installer.email)
        .bind(&installer.phone)
        .bind(&installer.company)
        .bind(installer.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(installer)
    }

    async fn insert_checkin(&self, checkin: &Checkin) -> Result<()> {
        sqlx::query(
            "INSERT INTO checkins
             (id, installer_guid, location, project_name, checkin_time,
              completion_time, status, checklist_data, notes, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&checkin.id)
        .bind(checkin.installer_id.to_string())
        .bind(&checkin.location)
        .bind(&checkin.project_name)
        .bind(checkin.checkin_time.to_rfc3339())
        .bind(checkin.completion_time.map(|ts| ts.to_rfc3339()))
        .bind(checkin.status.as_str())
        .bind(encode_checklist(&checkin.checklist_data)?)
        .bind(&checkin.notes)
        .bind(checkin.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_checklist(&self, checkin_id: &str, data: &ChecklistData) -> Result<()> {
        let result = sqlx::query(
            "UPDATE checkins SET checklist_data = ?
             WHERE id = ? AND status = 'in_progress'",
        )
        .bind(encode_checklist(data)?)
        .bind(checkin_id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!(
                "in-progress check-in {}",
                checkin_id
            )));
        }
        Ok(())
    }

    async fn complete_checkin(
        &self,
        checkin_id: &str,
        completion_time: DateTime<Utc>,
        data: &ChecklistData,
    ) -> Result<()> {
        // status guard in the WHERE clause keeps transitions forward-only
        let result = sqlx::query(
            "UPDATE checkins
             SET status = 'completed', completion_time = ?, checklist_data = ?
             WHERE id = ? AND status = 'in_progress'",
        )
        .bind(completion_time.to_rfc3339())
        .bind(encode_checklist(data)?)
        .bind(checkin_id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!(
                "in-progress check-in {}",
                checkin_id
            )));
        }
        Ok(())
    }

    async fn fetch_checkin(&self, checkin_id: &str) -> Result<Option<Checkin>> {
        let row = sqlx::query("SELECT * FROM checkins WHERE id = ?")
            .bind(checkin_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(checkin_from_row).transpose()
    }

    async fn list_checkins(&self) -> Result<Vec<CheckinSummary>> {
        let rows = sqlx::query(
            "SELECT c.id, c.location, c.project_name, c.checkin_time,
                    c.completion_time, c.status, c.checklist_data, c.created_at,
                    i.name AS installer_name, i.company AS installer_company,
                    i.email AS installer_email
             FROM checkins c
             JOIN installers i ON i.guid = c.installer_guid
             ORDER BY c.created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut summaries = Vec::with_capacity(rows.len());
        for row in &rows {
            let checkin_time: String = row.try_get("checkin_time")?;
            let completion_time: Option<String> = row.try_get("completion_time")?;
            let status: String = row.try_get("status")?;
            let checklist_data: String = row.try_get("checklist_data")?;
            let created_at: String = row.try_get("created_at")?;

            let status = parse_status(&status)?;
            let data = decode_checklist(&checklist_data)?;
            let completed = progress::completed_count(&data);
            let total = crate::catalog::CATALOG_SIZE;

            summaries.push(CheckinSummary {
                id: row.try_get("id")?,
                project_name: row.try_get("project_name")?,
                location: row.try_get("location")?,
                status,
                status_color: status.color(),
                checkin_time: parse_ts(&checkin_time, "checkin_time")?,
                completion_time: completion_time
                    .map(|ts| parse_ts(&ts, "completion_time"))
                    .transpose()?,
                created_at: parse_ts(&created_at, "created_at")?,
                installer_name: row.try_get("installer_name")?,
                installer_company: row.try_get("installer_company")?,
                installer_email: row.try_get("installer_email")?,
                completed_items: completed,
                total_items: total,
                progress_percent: progress::progress_percent(completed, total),
            });
        }
        Ok(summaries)
    }
}
