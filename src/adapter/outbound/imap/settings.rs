//! Mailbox configuration.

use std::time::Duration;

use serde::Deserialize;

/// IMAP mailbox settings.
///
/// The password is loaded from `MAILSIGNAL_MAIL_PASSWORD` at runtime (never
/// from the config file).
#[derive(Debug, Clone, Deserialize)]
pub struct MailboxConfig {
    /// IMAP server host (implicit TLS).
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Login account, usually the full address.
    pub account: String,
    /// Folder to watch.
    #[serde(default = "default_folder")]
    pub folder: String,
    /// Only mail from this address is considered.
    #[serde(default = "default_sender")]
    pub sender: String,
    /// Socket and per-command timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// App password loaded from the environment.
    #[serde(skip)]
    pub password: Option<String>,
}

impl MailboxConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

const fn default_port() -> u16 {
    993
}

fn default_folder() -> String {
    "INBOX".to_string()
}

fn default_sender() -> String {
    "noreply@tradingview.com".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}
