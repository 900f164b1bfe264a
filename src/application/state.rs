//! Session-scoped relay state.
//!
//! One [`RelayState`] lives for the whole process. It is handed by `&mut`
//! to the poll controller and the rate limiter, and returned by the
//! supervisor on shutdown for the session summary.

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{BoundedHistory, DailyCounter, MessageId, Signal, Stamped};
use crate::port::Event;

/// Capacities of the three display histories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryLimits {
    pub signals: usize,
    pub events: usize,
    pub alerts: usize,
}

impl Default for HistoryLimits {
    fn default() -> Self {
        Self {
            signals: 50,
            events: 200,
            alerts: 50,
        }
    }
}

/// A signal accepted by the webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentSignal {
    pub id: MessageId,
    pub signal: Signal,
    /// Daily count including this signal.
    pub daily_count: u32,
}

/// Counter and histories for one relay session.
#[derive(Debug)]
pub struct RelayState {
    counter: DailyCounter,
    sent: BoundedHistory<Stamped<SentSignal>>,
    events: BoundedHistory<Stamped<Event>>,
    alerts: BoundedHistory<Stamped<String>>,
}

impl RelayState {
    /// Fresh state with a zero count for `today`.
    #[must_use]
    pub fn new(today: NaiveDate, limits: HistoryLimits) -> Self {
        Self {
            counter: DailyCounter::new(today),
            sent: BoundedHistory::new(limits.signals),
            events: BoundedHistory::new(limits.events),
            alerts: BoundedHistory::new(limits.alerts),
        }
    }

    #[must_use]
    pub const fn counter(&self) -> &DailyCounter {
        &self.counter
    }

    pub fn counter_mut(&mut self) -> &mut DailyCounter {
        &mut self.counter
    }

    #[must_use]
    pub const fn daily_count(&self) -> u32 {
        self.counter.count()
    }

    /// Append an event; problems are also copied to the alert history.
    pub fn record(&mut self, at: DateTime<Utc>, event: &Event) {
        if event.is_problem() {
            self.alerts.push(Stamped {
                at,
                value: event.summary(),
            });
        }
        self.events.push(Stamped {
            at,
            value: event.clone(),
        });
    }

    pub fn record_sent(&mut self, at: DateTime<Utc>, sent: SentSignal) {
        self.sent.push(Stamped { at, value: sent });
    }

    #[must_use]
    pub const fn sent(&self) -> &BoundedHistory<Stamped<SentSignal>> {
        &self.sent
    }

    #[must_use]
    pub const fn events(&self) -> &BoundedHistory<Stamped<Event>> {
        &self.events
    }

    #[must_use]
    pub const fn alerts(&self) -> &BoundedHistory<Stamped<String>> {
        &self.alerts
    }
}
