//! Infrastructure bootstrap helpers for runtime wiring.

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::imap::ImapConnector;
use crate::adapter::outbound::smtp::SmtpAlertSender;
use crate::adapter::outbound::webhook::{WebhookClient, WebhookTarget};
use crate::application::{EventBus, RateLimiter, RelayState, SignalRelay, Supervisor};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::{
    AlertSender, Clock, LogNotifier, MailConnector, Notifier, NotifierRegistry, NullAlertSender,
    SignalDelivery, SystemClock,
};

/// Build notifier registry: the log notifier plus any extra sinks.
pub fn build_notifier_registry(extra: Vec<Box<dyn Notifier>>) -> NotifierRegistry {
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(LogNotifier));
    for notifier in extra {
        registry.register(notifier);
    }
    registry
}

/// Build the alert sender, or a null sender when alerts are disabled.
///
/// # Errors
///
/// Returns an error if alerts are enabled but the SMTP settings are
/// incomplete.
pub fn build_alert_sender(config: &Config) -> Result<Arc<dyn AlertSender>> {
    if config.alert.enabled {
        info!(host = %config.alert.smtp_host, to = %config.alert.to, "Email alerts enabled");
        Ok(Arc::new(SmtpAlertSender::from_config(&config.alert)?))
    } else {
        Ok(Arc::new(NullAlertSender))
    }
}

/// Build the webhook client for the selected target.
///
/// # Errors
///
/// Returns an error if the target URL or the token is missing or invalid.
pub fn build_delivery(config: &Config, target: WebhookTarget) -> Result<Arc<dyn SignalDelivery>> {
    Ok(Arc::new(WebhookClient::from_config(&config.webhook, target)?))
}

/// Assemble the poll cycle controller from already-built adapters.
pub fn build_relay(
    config: &Config,
    delivery: Arc<dyn SignalDelivery>,
    alerts: Arc<dyn AlertSender>,
    notifiers: Arc<NotifierRegistry>,
    clock: Arc<dyn Clock>,
) -> SignalRelay {
    let limiter = RateLimiter::new(config.limits.daily_cap, config.zone(), alerts);
    let bus = EventBus::new(notifiers, clock);
    SignalRelay::new(config.mailbox.sender.clone(), limiter, delivery, bus)
}

/// Fresh relay state for today.
pub fn build_state(config: &Config, relay: &SignalRelay) -> RelayState {
    let today = relay.limiter().today(relay.bus().now());
    RelayState::new(today, config.history.limits())
}

/// Assemble a supervisor around any mail connector.
pub fn build_supervisor_with<C: MailConnector>(
    config: &Config,
    connector: C,
    relay: SignalRelay,
) -> Supervisor<C> {
    let state = build_state(config, &relay);
    Supervisor::new(
        connector,
        relay,
        config.reconnection.backoff(),
        config.polling.interval(),
        state,
    )
}

/// Composition root for `mailsignal run`.
///
/// # Errors
///
/// Returns an error if any adapter cannot be built from the configuration.
pub fn build_supervisor(
    config: &Config,
    target: WebhookTarget,
    notifiers: NotifierRegistry,
) -> Result<Supervisor<ImapConnector>> {
    let connector = ImapConnector::new(config.mailbox.clone())?;
    let delivery = build_delivery(config, target)?;
    let alerts = build_alert_sender(config)?;
    let notifiers = Arc::new(notifiers);
    info!(notifiers = notifiers.len(), "Notifiers initialized");

    let relay = build_relay(config, delivery, alerts, notifiers, Arc::new(SystemClock));
    Ok(build_supervisor_with(config, connector, relay))
}
