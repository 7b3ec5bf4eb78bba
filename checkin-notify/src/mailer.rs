//! Outbound mail delivery

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::info;

use checkin_common::{Error, Result};

/// One rendered email ready for delivery
#[derive(Debug, Clone, Serialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Delivery backend for completion emails
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// Delivers through an HTTP mail-relay endpoint
pub struct RelayMailer {
    client: Client,
    url: String,
    token: Option<String>,
}

impl RelayMailer {
    pub fn new(url: String, token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            url,
            token,
        }
    }
}

#[async_trait]
impl Mailer for RelayMailer {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        let mut request = self.client.post(&self.url).json(message);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| Error::Notify(e.to_string()))?;
        if !response.status().is_success() {
            return Err(Error::Notify(format!(
                "mail relay returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}

/// Logs instead of delivering; used when no relay is configured
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        info!(
            "Would send \"{}\" to {} ({} bytes of HTML)",
            message.subject,
            message.to,
            message.html.len()
        );
        Ok(())
    }
}
