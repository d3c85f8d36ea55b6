//! Outbound notifications about new comments

use async_trait::async_trait;

use crate::error::Result;

/// Sends a text message to a chat channel
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, channel_id: &str, text: &str) -> Result<()>;
}

/// Notifier used when no chat integration is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn send(&self, channel_id: &str, _text: &str) -> Result<()> {
        tracing::debug!(channel_id, "notifications disabled, dropping message");
        Ok(())
    }
}
