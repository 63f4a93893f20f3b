//! Enterprise WeChat group-bot client
//!
//! Posts rendered messages to the bot webhook. One attempt per message,
//! no retries.

use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};

use super::types::{BotResponse, Envelope};
use crate::error::NotifierError;
use crate::report::RenderedMessage;

pub struct WeChatClient {
    webhook_url: String,
    http_client: Client,
    dry_run: bool,
}

/// Outcome of a single delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryResult {
    pub status: u16,
    pub body: String,
    pub skipped: bool,
}

impl DeliveryResult {
    fn skipped() -> Self {
        Self {
            status: 0,
            body: String::new(),
            skipped: true,
        }
    }
}

impl WeChatClient {
    pub fn new(webhook_url: String, timeout: Duration, dry_run: bool) -> Result<Self, NotifierError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                NotifierError::ConfigError(format!("Failed to build chat HTTP client: {}", e))
            })?;

        Ok(Self {
            webhook_url,
            http_client,
            dry_run,
        })
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub async fn dispatch(&self, message: &RenderedMessage) -> Result<DeliveryResult, NotifierError> {
        let envelope = Envelope::from(message);

        if self.dry_run {
            info!(
                "Dry run, not sending {:?} message: {}",
                message.kind,
                serde_json::to_string(&envelope).unwrap_or_default()
            );
            return Ok(DeliveryResult::skipped());
        }

        let response = self
            .http_client
            .post(&self.webhook_url)
            .json(&envelope)
            .send()
            .await
            .map_err(|e| NotifierError::DeliveryFailed(format!("request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| NotifierError::DeliveryFailed(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            warn!("Chat webhook returned {}: {}", status, body);
            return Err(NotifierError::DeliveryFailed(NotifierError::unexpected_status(
                "chat webhook",
                status,
            )));
        }

        // An unparseable body is accepted as long as the status was 2xx.
        if let Ok(bot) = serde_json::from_str::<BotResponse>(&body) {
            if bot.errcode != 0 {
                warn!("Chat webhook rejected message: {} {}", bot.errcode, bot.errmsg);
                return Err(NotifierError::DeliveryFailed(format!(
                    "bot rejected message with errcode {}: {}",
                    bot.errcode, bot.errmsg
                )));
            }
        }

        info!("Delivered {:?} message, status {}", message.kind, status);
        Ok(DeliveryResult {
            status: status.as_u16(),
            body,
            skipped: false,
        })
    }
}
