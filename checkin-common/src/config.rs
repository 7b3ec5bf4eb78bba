//! Configuration loading
//!
//! Resolution priority for every setting:
//! 1. Command-line argument (handled by each binary's clap definition)
//! 2. Environment variable (also handled via clap `env` attributes)
//! 3. TOML config file
//! 4. Compiled default
//!
//! A missing config file is not an error: services log a warning and
//! start with defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::error::{Error, Result};

/// Environment variable naming an explicit config file location
pub const CONFIG_ENV_VAR: &str = "CHECKIN_CONFIG";

/// Default ports for the two services
pub const DEFAULT_WEB_PORT: u16 = 5750;
pub const DEFAULT_NOTIFY_PORT: u16 = 5751;

/// Fallback recipient when a completion payload carries no installer email
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@company.com";

/// Default sender address for completion emails
pub const DEFAULT_FROM_ADDRESS: &str = "noreply@company.com";

/// `[web]` section of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebSection {
    pub port: Option<u16>,
    pub database_path: Option<PathBuf>,
    /// Select the in-memory demo store instead of SQLite
    pub demo_mode: Option<bool>,
    /// Completion notification function endpoint
    pub notify_url: Option<String>,
}

/// `[notify]` section of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotifySection {
    pub port: Option<u16>,
    /// HTTP mail-relay endpoint; when absent, emails are logged instead
    pub mail_relay_url: Option<String>,
    pub mail_relay_token: Option<String>,
    pub from_address: Option<String>,
    pub admin_email: Option<String>,
}

/// Parsed TOML configuration file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub web: WebSection,
    #[serde(default)]
    pub notify: NotifySection,
}

impl TomlConfig {
    /// Load configuration, resolving the file location in priority order:
    /// explicit path, `CHECKIN_CONFIG`, then the platform config
    /// directory. Missing files degrade to defaults with a warning.
    pub fn load(explicit: Option<&Path>) -> Result<TomlConfig> {
        let candidate = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => match std::env::var(CONFIG_ENV_VAR) {
                Ok(value) => Some(PathBuf::from(value)),
                Err(_) => default_config_path(),
            },
        };

        let Some(path) = candidate else {
            warn!("No config file location available; using compiled defaults");
            return Ok(TomlConfig::default());
        };

        if !path.exists() {
            // Only an explicitly requested file is an error when absent
            if explicit.is_some() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            warn!(
                "Config file not found at {}; using compiled defaults",
                path.display()
            );
            return Ok(TomlConfig::default());
        }

        let content = std::fs::read_to_string(&path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }
}

/// Platform default config file: `<config dir>/checkin/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("checkin").join("config.toml"))
}

/// Platform default database file: `<data dir>/checkin/checkin.db`
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("checkin").join("checkin.db"))
        .unwrap_or_else(|| PathBuf::from("checkin.db"))
}
