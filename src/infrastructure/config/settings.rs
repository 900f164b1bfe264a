//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all relay settings.
//! Configuration is loaded from a TOML file; secrets come only from the
//! environment (`MAILSIGNAL_MAIL_PASSWORD`, `MAILSIGNAL_WEBHOOK_TOKEN`,
//! `MAILSIGNAL_SMTP_PASSWORD`).
//!
//! # Example
//!
//! ```no_run
//! use mailsignal::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.logging.init();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;

use super::limits::{LimitsConfig, PollingConfig};
use super::logging::LoggingConfig;
use super::reconnection::{HistoryConfig, ReconnectionConfig};
use crate::adapter::outbound::imap::MailboxConfig;
use crate::adapter::outbound::smtp::AlertConfig;
use crate::adapter::outbound::webhook::WebhookConfig;
use crate::error::{ConfigError, Result};

/// Environment variable holding the IMAP app password.
pub const MAIL_PASSWORD_ENV: &str = "MAILSIGNAL_MAIL_PASSWORD";
/// Environment variable holding the webhook shared secret.
pub const WEBHOOK_TOKEN_ENV: &str = "MAILSIGNAL_WEBHOOK_TOKEN";
/// Environment variable holding the SMTP password for alerts.
pub const SMTP_PASSWORD_ENV: &str = "MAILSIGNAL_SMTP_PASSWORD";

/// Longest accepted network timeout.
const MAX_TIMEOUT_SECS: u64 = 3600;
/// Largest accepted display history.
const MAX_HISTORY: usize = 100_000;

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Mailbox to watch.
    pub mailbox: MailboxConfig,

    /// Trading bot endpoints.
    #[serde(default)]
    pub webhook: WebhookConfig,

    /// Daily cap and reference timezone.
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Poll loop cadence.
    #[serde(default)]
    pub polling: PollingConfig,

    /// Reconnection backoff.
    #[serde(default)]
    pub reconnection: ReconnectionConfig,

    /// Display history sizes.
    #[serde(default)]
    pub history: HistoryConfig,

    /// Email alerts on rejected signals.
    #[serde(default)]
    pub alert: AlertConfig,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn env_secret(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.into(),
    }
}

fn check_timeout(field: &'static str, secs: u64) -> std::result::Result<(), ConfigError> {
    if secs == 0 {
        return Err(invalid(field, "must be greater than 0"));
    }
    if secs > MAX_TIMEOUT_SECS {
        return Err(invalid(field, format!("must be at most {MAX_TIMEOUT_SECS}")));
    }
    Ok(())
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// Loads secrets from the environment. A missing secret is not an error
    /// here; it is reported when the adapter that needs it is built.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        // Secrets are never read from the config file
        config.mailbox.password = env_secret(MAIL_PASSWORD_ENV);
        config.webhook.token = env_secret(WEBHOOK_TOKEN_ENV);
        config.alert.password = env_secret(SMTP_PASSWORD_ENV);

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Reference timezone for the daily counter.
    ///
    /// Always valid after [`Config::validate`] passed.
    #[must_use]
    pub fn zone(&self) -> FixedOffset {
        self.limits.zone().unwrap_or_else(|| Utc.fix())
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        let mailbox = &self.mailbox;
        if mailbox.host.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "mailbox.host",
            }
            .into());
        }
        if mailbox.account.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "mailbox.account",
            }
            .into());
        }
        if mailbox.folder.trim().is_empty() {
            return Err(invalid("mailbox.folder", "must not be empty").into());
        }
        if mailbox.sender.is_empty()
            || mailbox
                .sender
                .chars()
                .any(|c| c == '"' || c == '\\' || c.is_whitespace() || c.is_control())
        {
            return Err(invalid(
                "mailbox.sender",
                "must be a bare address without quotes, backslashes or spaces",
            )
            .into());
        }
        check_timeout("mailbox.timeout_secs", mailbox.timeout_secs)?;

        let webhook = &self.webhook;
        url::Url::parse(&webhook.local_url)
            .map_err(|e| invalid("webhook.local_url", e.to_string()))?;
        if let Some(public_url) = &webhook.public_url {
            url::Url::parse(public_url)
                .map_err(|e| invalid("webhook.public_url", e.to_string()))?;
        }
        if webhook.token_header.trim().is_empty() {
            return Err(invalid("webhook.token_header", "must not be empty").into());
        }
        check_timeout("webhook.timeout_secs", webhook.timeout_secs)?;

        if self.limits.zone().is_none() {
            return Err(invalid(
                "limits.utc_offset_minutes",
                "must be strictly between -1440 and 1440",
            )
            .into());
        }

        if self.polling.interval_secs == 0 {
            return Err(invalid("polling.interval_secs", "must be greater than 0").into());
        }

        if self.reconnection.initial_delay_secs == 0 {
            return Err(invalid(
                "reconnection.initial_delay_secs",
                "must be greater than 0",
            )
            .into());
        }
        if self.reconnection.max_delay_secs < self.reconnection.initial_delay_secs {
            return Err(invalid(
                "reconnection.max_delay_secs",
                "must be >= initial_delay_secs",
            )
            .into());
        }

        let history = &self.history;
        for (field, size) in [
            ("history.signals", history.signals),
            ("history.events", history.events),
            ("history.alerts", history.alerts),
        ] {
            if size > MAX_HISTORY {
                return Err(invalid(field, format!("must be at most {MAX_HISTORY}")).into());
            }
        }

        if self.alert.enabled {
            if self.alert.smtp_host.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: "alert.smtp_host",
                }
                .into());
            }
            if self.alert.from.trim().is_empty() {
                return Err(ConfigError::MissingField { field: "alert.from" }.into());
            }
            if self.alert.to.trim().is_empty() {
                return Err(ConfigError::MissingField { field: "alert.to" }.into());
            }
            check_timeout("alert.timeout_secs", self.alert.timeout_secs)?;
        }

        if !self.logging.is_known_format() {
            return Err(invalid("logging.format", "must be \"pretty\" or \"json\"").into());
        }

        Ok(())
    }
}
