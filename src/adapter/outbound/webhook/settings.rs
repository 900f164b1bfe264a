//! Webhook configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Which configured endpoint receives signals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebhookTarget {
    /// Bot running on this machine.
    #[default]
    Local,
    /// Bot exposed through a public tunnel.
    Public,
}

impl std::fmt::Display for WebhookTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Public => write!(f, "public"),
        }
    }
}

/// Trading bot webhook settings.
///
/// The shared secret is loaded from `MAILSIGNAL_WEBHOOK_TOKEN` at runtime
/// (never from the config file).
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    #[serde(default = "default_local_url")]
    pub local_url: String,
    #[serde(default)]
    pub public_url: Option<String>,
    /// Header carrying the shared secret.
    #[serde(default = "default_token_header")]
    pub token_header: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(skip)]
    pub token: Option<String>,
}

impl WebhookConfig {
    /// URL for the given target.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] if the public URL is selected
    /// but not configured.
    pub fn url(&self, target: WebhookTarget) -> Result<&str> {
        match target {
            WebhookTarget::Local => Ok(&self.local_url),
            WebhookTarget::Public => self
                .public_url
                .as_deref()
                .ok_or_else(|| ConfigError::MissingField {
                    field: "webhook.public_url",
                }.into()),
        }
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            local_url: default_local_url(),
            public_url: None,
            token_header: default_token_header(),
            timeout_secs: default_timeout_secs(),
            token: None,
        }
    }
}

fn default_local_url() -> String {
    "http://127.0.0.1:5001/webhook".to_string()
}

fn default_token_header() -> String {
    "X-WEBHOOK-TOKEN".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}
