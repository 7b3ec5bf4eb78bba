//! checkin-web - Installer workflow service
//!
//! Serves the check-in intake, checklist execution, finalize/print, and
//! dashboard API. Persistence goes to SQLite by default; `--demo`
//! selects the in-memory store for running without a database file.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use checkin_common::config::{self, TomlConfig};
use checkin_common::notify::{Notifier, NullNotifier};
use checkin_common::store::{MemoryStore, SqliteStore, Store};
use checkin_web::notifier::HttpNotifier;
use checkin_web::{build_router, AppState};

/// Command-line arguments for checkin-web
#[derive(Parser, Debug)]
#[command(name = "checkin-web")]
#[command(about = "Installer check-in workflow service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "CHECKIN_WEB_PORT")]
    port: Option<u16>,

    /// Config file path
    #[arg(short, long, env = "CHECKIN_CONFIG")]
    config: Option<PathBuf>,

    /// SQLite database file path
    #[arg(short, long, env = "CHECKIN_DATABASE")]
    database: Option<PathBuf>,

    /// Use the in-memory demo store instead of SQLite
    #[arg(long, env = "CHECKIN_DEMO_MODE")]
    demo: bool,

    /// Completion notification function endpoint
    #[arg(long, env = "CHECKIN_NOTIFY_URL")]
    notify_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "checkin_web=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    info!(
        "Starting Installer Check-in web service (checkin-web) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let toml = TomlConfig::load(args.config.as_deref())?;
    let port = args
        .port
        .or(toml.web.port)
        .unwrap_or(config::DEFAULT_WEB_PORT);
    let demo_mode = args.demo || toml.web.demo_mode.unwrap_or(false);
    let notify_url = args.notify_url.or(toml.web.notify_url.clone());

    let store: Arc<dyn Store> = if demo_mode {
        warn!("Demo mode: using in-memory store; data is lost on shutdown");
        Arc::new(MemoryStore::new())
    } else {
        let db_path = args
            .database
            .or(toml.web.database_path.clone())
            .unwrap_or_else(config::default_database_path);
        info!("Database path: {}", db_path.display());
        Arc::new(SqliteStore::connect(&db_path).await?)
    };

    let notifier: Arc<dyn Notifier> = match notify_url {
        Some(url) => {
            info!("Completion notifications go to {}", url);
            Arc::new(HttpNotifier::new(url))
        }
        None => {
            warn!("No notify endpoint configured; completion emails are dropped");
            Arc::new(NullNotifier)
        }
    };

    let state = AppState::new(store, notifier);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    info!("checkin-web listening on http://127.0.0.1:{}", port);
    info!("Health check: http://127.0.0.1:{}/health", port);

    axum::serve(listener, app).await?;

    Ok(())
}
