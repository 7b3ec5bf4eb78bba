//! HTTP notifier: invokes the completion-email function

use async_trait::async_trait;
use reqwest::Client;

use checkin_common::notify::{CompletionPayload, Notifier};
use checkin_common::{Error, Result};

/// Posts completion payloads to the notify service. Failures are
/// reported to the caller, which treats them as best-effort.
pub struct HttpNotifier {
    client: Client,
    endpoint: String,
}

impl HttpNotifier {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn send_completion(&self, payload: &CompletionPayload) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|e| Error::Notify(e.to_string()))?;
        if !response.status().is_success() {
            return Err(Error::Notify(format!(
                "notify function returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}
