//! Slack notifier
//!
//! Posts plain text messages with a bot token through `chat.postMessage`.

use std::time::Duration;

use async_trait::async_trait;
use quill_core::{Error, Notifier, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

const SLACK_API_URL: &str = "https://slack.com/api/chat.postMessage";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct SlackNotifier {
    client: reqwest::Client,
    token: String,
    api_url: String,
}

#[derive(Serialize)]
struct PostMessage<'a> {
    channel: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct SlackResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

impl SlackNotifier {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_api_url(token, SLACK_API_URL)
    }

    /// Point the notifier at another `chat.postMessage` endpoint
    pub fn with_api_url(token: impl Into<String>, api_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            token: token.into(),
            api_url: api_url.into(),
        })
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn send(&self, channel_id: &str, text: &str) -> Result<()> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.token)
            .json(&PostMessage {
                channel: channel_id,
                text,
            })
            .send()
            .await
            .map_err(|e| Error::Notification(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Notification(format!("Slack responded with {}", status)));
        }

        let body: SlackResponse = response
            .json()
            .await
            .map_err(|e| Error::Notification(e.to_string()))?;

        if !body.ok {
            let reason = body.error.unwrap_or_else(|| "unknown error".to_string());
            return Err(Error::Notification(format!(
                "failed to post to Slack channel {}: {}",
                channel_id, reason
            )));
        }

        info!(channel_id, "message sent to Slack channel");
        Ok(())
    }
}
