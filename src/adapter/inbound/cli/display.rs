//! Live terminal display of relay events.

use chrono::{FixedOffset, Utc};

use super::output;
use crate::port::{Event, Notifier};

/// Notifier that renders events as timestamped terminal lines.
pub struct ConsoleNotifier {
    zone: FixedOffset,
}

impl ConsoleNotifier {
    /// Timestamps are shown in `zone`, the same zone as the daily counter.
    #[must_use]
    pub const fn new(zone: FixedOffset) -> Self {
        Self { zone }
    }

    fn timestamp(&self) -> String {
        Utc::now()
            .with_timezone(&self.zone)
            .format("%H:%M:%S")
            .to_string()
    }
}

/// Short label shown before the event text.
fn label(event: &Event) -> &'static str {
    match event {
        Event::Connecting { .. }
        | Event::Connected { .. }
        | Event::ConnectFailed { .. }
        | Event::ConnectionLost { .. }
        | Event::ReconnectScheduled { .. } => "mailbox",
        Event::CounterRestored { .. } | Event::CounterReset { .. } => "counter",
        Event::BatchDetected { .. }
        | Event::ExtractionFailed { .. }
        | Event::FlagFailed { .. }
        | Event::CandidateDiscarded { .. } => "inbox",
        Event::SignalSelected { .. }
        | Event::SignalDelivered(_)
        | Event::DeliveryFailed { .. }
        | Event::RateLimited(_)
        | Event::CapOverride(_) => "signal",
        Event::AlertFailed { .. } => "alert",
        Event::ShuttingDown => "relay",
    }
}

/// Routine events only shown with `-v`.
fn is_chatty(event: &Event) -> bool {
    matches!(
        event,
        Event::Connecting { .. } | Event::CandidateDiscarded { .. } | Event::SignalSelected { .. }
    )
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, event: Event) {
        if is_chatty(&event) && output::verbosity() == 0 {
            return;
        }

        let ts = self.timestamp();
        let text = event.summary();
        match &event {
            Event::SignalDelivered(_) => output::delivered(&ts, &text),
            e if e.is_problem() => output::rejected(&ts, &text),
            e => output::info(&ts, label(e), &text),
        }
    }
}
