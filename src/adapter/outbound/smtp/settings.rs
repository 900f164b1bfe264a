//! Alert email configuration.

use std::time::Duration;

use serde::Deserialize;

/// SMTP relay used for operator alerts.
///
/// The password is loaded from `MAILSIGNAL_SMTP_PASSWORD` at runtime (never
/// from the config file).
#[derive(Debug, Clone, Deserialize)]
pub struct AlertConfig {
    /// Alerts are only sent when enabled.
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// STARTTLS on a submission port; otherwise implicit TLS.
    #[serde(default = "default_starttls")]
    pub starttls: bool,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(skip)]
    pub password: Option<String>,
}

impl AlertConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: String::new(),
            smtp_port: default_smtp_port(),
            starttls: default_starttls(),
            username: String::new(),
            from: String::new(),
            to: String::new(),
            timeout_secs: default_timeout_secs(),
            password: None,
        }
    }
}

const fn default_smtp_port() -> u16 {
    587
}

const fn default_starttls() -> bool {
    true
}

const fn default_timeout_secs() -> u64 {
    20
}
