//! Daily signal cap.
//!
//! The cap bounds how many signals reach the bot per calendar day in the
//! configured reference timezone. A SELL always goes through so that an
//! open position can be closed after the cap is hit.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use tracing::debug;

use crate::application::events::EventBus;
use crate::application::state::RelayState;
use crate::domain::{local_date, MessageId, Signal};
use crate::error::RateLimitError;
use crate::port::{AlertSender, Event, SignalEvent};

/// Limiter decision for one signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Below the cap.
    Admitted,
    /// At or above the cap, let through because it is a SELL.
    Override,
    /// At or above the cap.
    Rejected(RateLimitError),
}

impl Admission {
    #[must_use]
    pub const fn is_admitted(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}

/// Rate limiter with a SELL override and email alerting on rejection.
pub struct RateLimiter {
    cap: u32,
    zone: FixedOffset,
    alerts: Arc<dyn AlertSender>,
}

impl RateLimiter {
    pub fn new(cap: u32, zone: FixedOffset, alerts: Arc<dyn AlertSender>) -> Self {
        Self { cap, zone, alerts }
    }

    #[must_use]
    pub const fn cap(&self) -> u32 {
        self.cap
    }

    /// Calendar date of `now` in the reference timezone.
    #[must_use]
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        local_date(now, self.zone)
    }

    /// Reset the counter if `today` differs from its date.
    pub fn roll_over(&self, state: &mut RelayState, today: NaiveDate) -> bool {
        state.counter_mut().roll_over(today)
    }

    /// Pure cap decision for a signal at the given count.
    #[must_use]
    pub fn evaluate(&self, signal: Signal, count: u32) -> Admission {
        if count < self.cap {
            Admission::Admitted
        } else if signal.is_sell() {
            Admission::Override
        } else {
            Admission::Rejected(RateLimitError::DailyCapReached {
                count,
                cap: self.cap,
            })
        }
    }

    /// Decide on `signal` and carry out the side effects of the decision.
    ///
    /// A rejection records an alert entry and sends exactly one alert email.
    /// Alert delivery is best-effort.
    pub async fn admit(
        &self,
        id: MessageId,
        signal: Signal,
        state: &mut RelayState,
        bus: &EventBus,
    ) -> Admission {
        let count = state.daily_count();
        let admission = self.evaluate(signal, count);
        let payload = SignalEvent {
            id,
            signal,
            daily_count: count,
            cap: self.cap,
        };

        match &admission {
            Admission::Admitted => debug!(count, cap = self.cap, "Signal within daily cap"),
            Admission::Override => bus.emit(state, Event::CapOverride(payload)),
            Admission::Rejected(err) => {
                bus.emit(state, Event::RateLimited(payload));
                let subject = format!("Daily signal cap reached ({count}/{})", self.cap);
                let body = format!(
                    "A {signal} signal from message {id} was not sent to the bot: {err}.\n\
                     SELL signals are still forwarded. The counter resets at midnight."
                );
                if let Err(e) = self.alerts.send_alert(&subject, &body).await {
                    bus.emit(
                        state,
                        Event::AlertFailed {
                            reason: e.to_string(),
                        },
                    );
                }
            }
        }

        admission
    }
}
