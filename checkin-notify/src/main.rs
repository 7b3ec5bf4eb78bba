//! checkin-notify - Completion email function
//!
//! Small HTTP service invoked by checkin-web when an installation is
//! finalized. Without a configured mail relay it logs the rendered
//! email instead of delivering, which keeps local setups zero-config.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use checkin_common::config::{self, TomlConfig};
use checkin_notify::mailer::{LogMailer, Mailer, RelayMailer};
use checkin_notify::{build_router, NotifyState};

/// Command-line arguments for checkin-notify
#[derive(Parser, Debug)]
#[command(name = "checkin-notify")]
#[command(about = "Completion email function for the installer check-in system")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "CHECKIN_NOTIFY_PORT")]
    port: Option<u16>,

    /// Config file path
    #[arg(short, long, env = "CHECKIN_CONFIG")]
    config: Option<PathBuf>,

    /// HTTP mail-relay endpoint
    #[arg(long, env = "CHECKIN_MAIL_RELAY_URL")]
    mail_relay_url: Option<String>,

    /// Bearer token for the mail relay
    #[arg(long, env = "CHECKIN_MAIL_RELAY_TOKEN")]
    mail_relay_token: Option<String>,

    /// Sender address for completion emails
    #[arg(long, env = "CHECKIN_FROM_ADDRESS")]
    from_address: Option<String>,

    /// Fallback recipient when a payload has no installer email
    #[arg(long, env = "CHECKIN_ADMIN_EMAIL")]
    admin_email: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "checkin_notify=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    info!(
        "Starting completion email function (checkin-notify) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let toml = TomlConfig::load(args.config.as_deref())?;
    let port = args
        .port
        .or(toml.notify.port)
        .unwrap_or(config::DEFAULT_NOTIFY_PORT);
    let relay_url = args.mail_relay_url.or(toml.notify.mail_relay_url.clone());
    let relay_token = args
        .mail_relay_token
        .or(toml.notify.mail_relay_token.clone());
    let from_address = args
        .from_address
        .or(toml.notify.from_address.clone())
        .unwrap_or_else(|| config::DEFAULT_FROM_ADDRESS.to_string());
    let admin_email = args
        .admin_email
        .or(toml.notify.admin_email.clone())
        .unwrap_or_else(|| config::DEFAULT_ADMIN_EMAIL.to_string());

    let mailer: Arc<dyn Mailer> = match relay_url {
        Some(url) => {
            info!("Delivering completion emails via {}", url);
            Arc::new(RelayMailer::new(url, relay_token))
        }
        None => {
            warn!("No mail relay configured; emails are logged, not delivered");
            Arc::new(LogMailer)
        }
    };

    let state = NotifyState::new(mailer, from_address, admin_email);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    info!("checkin-notify listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
