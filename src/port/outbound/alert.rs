//! Out-of-band alert port.

use async_trait::async_trait;

use crate::error::Result;

/// Sends an operator alert (an email in production).
#[async_trait]
pub trait AlertSender: Send + Sync {
    async fn send_alert(&self, subject: &str, body: &str) -> Result<()>;
}

/// Alert sender used when alerting is disabled.
pub struct NullAlertSender;

#[async_trait]
impl AlertSender for NullAlertSender {
    async fn send_alert(&self, subject: &str, _body: &str) -> Result<()> {
        tracing::debug!(subject, "Alerting disabled, alert not sent");
        Ok(())
    }
}
