use crate::web::sns::{LogLevel, Notifier, NotifyError};
use async_trait::async_trait;
use chrono::{Local, SecondsFormat};
use reqwest::StatusCode;
use tracing::{error, warn};

pub struct DiscordNotifier {
    client: reqwest::Client,
    webhook_url: String,
}

impl DiscordNotifier {
    pub fn new(webhook_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            webhook_url,
        }
    }

    async fn send_notification(&self, message: &str, level: LogLevel) -> Result<(), NotifyError> {
        if self.webhook_url.is_empty() {
            warn!("No Discord webhook URL provided, skipping notification");
            return Ok(());
        }

        let content = format_message(message, level);

        let resp = self
            .client
            .post(&self.webhook_url)
            .json(&serde_json::json!({ "content": content }))
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send Discord notification: {}", e);
                e
            })?;

        let status = resp.status();
        if status != StatusCode::OK && status != StatusCode::NO_CONTENT {
            warn!("Failed to send notification, status code: {}", status.as_u16());
        }

        Ok(())
    }
}

fn format_message(message: &str, level: LogLevel) -> String {
    let timestamp = Local::now().to_rfc3339_opts(SecondsFormat::Secs, false);
    format!("{} `[{}]` {}", timestamp, level, message)
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn send_error(&self, message: &str) -> Result<(), NotifyError> {
        self.send_notification(message, LogLevel::Error).await
    }
}
