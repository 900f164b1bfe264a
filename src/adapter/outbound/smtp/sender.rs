//! Plain-text alert emails over an authenticated SMTP relay.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use super::settings::AlertConfig;
use crate::error::{ConfigError, Error, Result};
use crate::port::AlertSender;

pub struct SmtpAlertSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpAlertSender {
    /// Build the transport. No connection is made until the first alert.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a missing host, password or
    /// unparseable address.
    pub fn from_config(config: &AlertConfig) -> Result<Self> {
        if config.smtp_host.is_empty() {
            return Err(ConfigError::MissingField {
                field: "alert.smtp_host",
            }
            .into());
        }
        let from = parse_mailbox("alert.from", &config.from)?;
        let to = parse_mailbox("alert.to", &config.to)?;
        let password = config
            .password
            .clone()
            .filter(|p| !p.is_empty())
            .ok_or(ConfigError::MissingField {
                field: "MAILSIGNAL_SMTP_PASSWORD",
            })?;
        let username = if config.username.is_empty() {
            config.from.clone()
        } else {
            config.username.clone()
        };

        let builder = if config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
        };
        let transport = builder
            .port(config.smtp_port)
            .credentials(Credentials::new(username, password))
            .timeout(Some(config.timeout()))
            .build();

        Ok(Self { transport, from, to })
    }
}

#[async_trait]
impl AlertSender for SmtpAlertSender {
    async fn send_alert(&self, subject: &str, body: &str) -> Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| Error::Alert(format!("failed to build alert email: {e}")))?;

        self.transport.send(message).await?;
        info!(to = %self.to, subject, "Alert email sent");
        Ok(())
    }
}

fn parse_mailbox(field: &'static str, value: &str) -> Result<Mailbox> {
    if value.is_empty() {
        return Err(ConfigError::MissingField { field }.into());
    }
    value.parse().map_err(|e: lettre::address::AddressError| {
        ConfigError::InvalidValue {
            field,
            reason: e.to_string(),
        }
        .into()
    })
}
