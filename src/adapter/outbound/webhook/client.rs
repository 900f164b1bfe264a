//! HTTP client posting signals to the trading bot.

use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Client as HttpClient;
use serde::Serialize;
use tracing::debug;

use super::settings::{WebhookConfig, WebhookTarget};
use crate::domain::Signal;
use crate::error::{ConfigError, Result};
use crate::port::{DeliveryResponse, SignalDelivery};

/// JSON body expected by the bot.
#[derive(Debug, Serialize)]
struct SignalPayload {
    side: Signal,
}

/// Posts `{"side": "BUY"|"SELL"}` with the shared-secret header.
pub struct WebhookClient {
    http: HttpClient,
    url: String,
    token_header: HeaderName,
    token: HeaderValue,
}

impl WebhookClient {
    /// Build a client for the selected endpoint.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the URL, header name or token is
    /// missing or invalid, or an HTTP error if the client cannot be built.
    pub fn from_config(config: &WebhookConfig, target: WebhookTarget) -> Result<Self> {
        let url = config.url(target)?.to_string();
        url::Url::parse(&url).map_err(|e| ConfigError::InvalidValue {
            field: "webhook.url",
            reason: e.to_string(),
        })?;

        let token_header =
            HeaderName::from_bytes(config.token_header.as_bytes()).map_err(|e| {
                ConfigError::InvalidValue {
                    field: "webhook.token_header",
                    reason: e.to_string(),
                }
            })?;

        let raw_token = config
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingField {
                field: "MAILSIGNAL_WEBHOOK_TOKEN",
            })?;
        let mut token = HeaderValue::from_str(raw_token).map_err(|e| ConfigError::InvalidValue {
            field: "MAILSIGNAL_WEBHOOK_TOKEN",
            reason: e.to_string(),
        })?;
        token.set_sensitive(true);

        let http = HttpClient::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            http,
            url,
            token_header,
            token,
        })
    }
}

#[async_trait]
impl SignalDelivery for WebhookClient {
    async fn deliver(&self, signal: Signal) -> Result<DeliveryResponse> {
        debug!(url = %self.url, signal = %signal, "Posting signal");
        let response = self
            .http
            .post(&self.url)
            .header(self.token_header.clone(), self.token.clone())
            .json(&SignalPayload { side: signal })
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        debug!(status, "Webhook responded");
        Ok(DeliveryResponse { status, body })
    }

    fn target(&self) -> &str {
        &self.url
    }
}
