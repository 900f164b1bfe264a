//! Notifier port for operational events.
//!
//! This module defines the events emitted by the relay while it connects,
//! polls and delivers signals, and the trait for sinks that consume them.

use std::time::Duration;

use chrono::NaiveDate;

use crate::domain::{MessageId, Signal};

/// Events that can trigger notifications.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A mailbox session is being opened.
    Connecting { host: String },
    /// The session is authenticated and the folder selected.
    Connected { host: String },
    /// Opening the session failed.
    ConnectFailed { reason: String },
    /// A live session stopped answering.
    ConnectionLost { reason: String },
    /// The supervisor will retry after `delay`.
    ReconnectScheduled { delay: Duration, attempt: u32 },
    /// Today's count was re-derived from the mailbox.
    CounterRestored { count: u32, date: NaiveDate },
    /// The date advanced and the counter went back to zero.
    CounterReset { date: NaiveDate },
    /// More than one unread candidate was found in one cycle.
    BatchDetected { count: usize },
    /// A candidate could not be fetched or decoded.
    ExtractionFailed { id: MessageId, reason: String },
    /// A candidate could not be flagged as read.
    FlagFailed { id: MessageId, reason: String },
    /// A stale or non-actionable candidate was flagged without acting on it.
    CandidateDiscarded { id: MessageId },
    /// The most recent actionable candidate of the cycle.
    SignalSelected { id: MessageId, signal: Signal },
    /// The webhook accepted a signal.
    SignalDelivered(SignalEvent),
    /// The webhook refused or could not be reached; the message stays unread.
    DeliveryFailed { id: MessageId, signal: Signal, reason: String },
    /// A BUY was dropped because the daily cap is reached.
    RateLimited(SignalEvent),
    /// A SELL went through although the daily cap is reached.
    CapOverride(SignalEvent),
    /// An alert email could not be sent.
    AlertFailed { reason: String },
    /// A stop request was received.
    ShuttingDown,
}

/// Signal-carrying event payload.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalEvent {
    /// Originating message.
    pub id: MessageId,
    /// The signal.
    pub signal: Signal,
    /// Daily count after the event.
    pub daily_count: u32,
    /// Configured daily cap.
    pub cap: u32,
}

impl Event {
    /// True for failures and rejections that belong in the alert history.
    #[must_use]
    pub const fn is_problem(&self) -> bool {
        matches!(
            self,
            Self::ConnectFailed { .. }
                | Self::ConnectionLost { .. }
                | Self::ExtractionFailed { .. }
                | Self::FlagFailed { .. }
                | Self::DeliveryFailed { .. }
                | Self::RateLimited(_)
                | Self::AlertFailed { .. }
        )
    }

    /// One-line human readable description.
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::Connecting { host } => format!("connecting to {host}"),
            Self::Connected { host } => format!("connected to {host}"),
            Self::ConnectFailed { reason } => format!("connection failed: {reason}"),
            Self::ConnectionLost { reason } => format!("connection lost: {reason}"),
            Self::ReconnectScheduled { delay, attempt } => {
                format!("reconnect attempt {attempt} in {}s", delay.as_secs())
            }
            Self::CounterRestored { count, date } => {
                format!("{count} signal(s) already sent on {date}")
            }
            Self::CounterReset { date } => format!("daily counter reset for {date}"),
            Self::BatchDetected { count } => format!("{count} unread alerts detected"),
            Self::ExtractionFailed { id, reason } => {
                format!("message {id} unreadable: {reason}")
            }
            Self::FlagFailed { id, reason } => format!("could not flag message {id}: {reason}"),
            Self::CandidateDiscarded { id } => format!("message {id} marked read (ignored)"),
            Self::SignalSelected { id, signal } => format!("{signal} selected from message {id}"),
            Self::SignalDelivered(e) => format!(
                "{} delivered from message {} ({}/{} today)",
                e.signal, e.id, e.daily_count, e.cap
            ),
            Self::DeliveryFailed { id, signal, reason } => {
                format!("{signal} from message {id} not delivered: {reason}")
            }
            Self::RateLimited(e) => format!(
                "{} from message {} dropped: daily cap {}/{} reached",
                e.signal, e.id, e.daily_count, e.cap
            ),
            Self::CapOverride(e) => format!(
                "{} from message {} allowed past daily cap {}/{}",
                e.signal, e.id, e.daily_count, e.cap
            ),
            Self::AlertFailed { reason } => format!("alert not sent: {reason}"),
            Self::ShuttingDown => "shutting down".to_string(),
        }
    }
}

/// Trait for notification handlers.
///
/// Notifications are fire-and-forget: `notify` must return quickly and never
/// fail the caller.
pub trait Notifier: Send + Sync {
    /// Handle an event.
    fn notify(&self, event: Event);
}

/// Registry of notifiers (composite pattern).
///
/// Broadcasts events to all registered notifiers.
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { notifiers: vec![] }
    }

    /// Register a notifier.
    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Notify all registered notifiers.
    pub fn notify_all(&self, event: &Event) {
        for notifier in &self.notifiers {
            notifier.notify(event.clone());
        }
    }

    /// Number of registered notifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

impl Default for NotifierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A no-op notifier for testing or when notifications are disabled.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _event: Event) {}
}

/// A logging notifier that logs events via tracing.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: Event) {
        use tracing::{debug, info, warn};
        match &event {
            Event::Connecting { host } => debug!(host = %host, "Connecting to mailbox"),
            Event::Connected { host } => info!(host = %host, "Mailbox connected"),
            Event::ConnectFailed { reason } => warn!(reason = %reason, "Mailbox connect failed"),
            Event::ConnectionLost { reason } => warn!(reason = %reason, "Mailbox connection lost"),
            Event::ReconnectScheduled { delay, attempt } => {
                info!(delay_secs = delay.as_secs(), attempt, "Reconnect scheduled");
            }
            Event::CounterRestored { count, date } => {
                info!(count, date = %date, "Daily counter restored from mailbox");
            }
            Event::CounterReset { date } => info!(date = %date, "Daily counter reset"),
            Event::BatchDetected { count } => warn!(count, "Several unread alerts detected"),
            Event::ExtractionFailed { id, reason } => {
                warn!(message = %id, reason = %reason, "Message could not be classified");
            }
            Event::FlagFailed { id, reason } => {
                warn!(message = %id, reason = %reason, "Message could not be flagged");
            }
            Event::CandidateDiscarded { id } => debug!(message = %id, "Candidate discarded"),
            Event::SignalSelected { id, signal } => {
                info!(message = %id, signal = %signal, "Signal selected");
            }
            Event::SignalDelivered(e) => {
                info!(
                    message = %e.id,
                    signal = %e.signal,
                    daily_count = e.daily_count,
                    cap = e.cap,
                    "Signal delivered"
                );
            }
            Event::DeliveryFailed { id, signal, reason } => {
                warn!(message = %id, signal = %signal, reason = %reason, "Delivery failed");
            }
            Event::RateLimited(e) => {
                warn!(
                    message = %e.id,
                    signal = %e.signal,
                    daily_count = e.daily_count,
                    cap = e.cap,
                    "Signal dropped by daily cap"
                );
            }
            Event::CapOverride(e) => {
                info!(
                    message = %e.id,
                    signal = %e.signal,
                    daily_count = e.daily_count,
                    cap = e.cap,
                    "Closing signal allowed past daily cap"
                );
            }
            Event::AlertFailed { reason } => warn!(reason = %reason, "Alert not sent"),
            Event::ShuttingDown => info!("Shutting down"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingNotifier {
        count: Arc<AtomicUsize>,
    }

    impl Notifier for CountingNotifier {
        fn notify(&self, _event: Event) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_registry_notify_all() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut registry = NotifierRegistry::new();

        registry.register(Box::new(CountingNotifier {
            count: count.clone(),
        }));
        registry.register(Box::new(CountingNotifier {
            count: count.clone(),
        }));

        registry.notify_all(&Event::ShuttingDown);

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_registry_len_and_is_empty() {
        let mut registry = NotifierRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);

        registry.register(Box::new(NullNotifier));
        assert!(!registry.is_empty());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_problem_classification() {
        let id = MessageId::new(4);
        assert!(Event::DeliveryFailed {
            id,
            signal: Signal::Buy,
            reason: "HTTP 500".into(),
        }
        .is_problem());
        assert!(!Event::SignalSelected {
            id,
            signal: Signal::Buy
        }
        .is_problem());
        assert!(!Event::ShuttingDown.is_problem());
    }

    #[test]
    fn test_summary_mentions_signal_and_count() {
        let event = Event::SignalDelivered(SignalEvent {
            id: MessageId::new(12),
            signal: Signal::Sell,
            daily_count: 3,
            cap: 10,
        });
        assert_eq!(event.summary(), "SELL delivered from message 12 (3/10 today)");
    }
}
