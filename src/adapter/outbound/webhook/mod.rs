//! Trading bot webhook adapter.

mod client;
pub mod settings;

pub use client::WebhookClient;
pub use settings::{WebhookConfig, WebhookTarget};
