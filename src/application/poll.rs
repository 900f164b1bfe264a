//! One polling pass over the mailbox.
//!
//! Each cycle looks at every unread alert from the configured sender, picks
//! the most recent one that carries a signal, and forwards at most that one.
//! Everything else is flagged read so it never surfaces again. The selected
//! message is flagged only once its fate is settled: delivered, or dropped by
//! the daily cap. A failed delivery leaves it unread for the next cycle.
//! Delivered messages also get a delivered mark, which is what the daily
//! count is rebuilt from after a reconnect.

use std::sync::Arc;

use tracing::debug;

use crate::application::events::EventBus;
use crate::application::extractor::classify;
use crate::application::limiter::RateLimiter;
use crate::application::state::{RelayState, SentSignal};
use crate::domain::{Extraction, MessageId, SearchQuery, Signal};
use crate::error::Result;
use crate::port::{Event, MailSession, SignalDelivery, SignalEvent};

/// Longest response body quoted in a delivery failure.
const MAX_REASON_BODY: usize = 200;

/// What a poll cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No unread alerts.
    Idle,
    /// Unread alerts, none carrying a signal. All were flagged.
    NoSignal { discarded: usize },
    /// The selected signal was accepted by the webhook.
    Delivered {
        id: MessageId,
        signal: Signal,
        discarded: usize,
    },
    /// The selected signal was dropped by the daily cap.
    RateLimited {
        id: MessageId,
        signal: Signal,
        discarded: usize,
    },
    /// The webhook did not accept the signal; its message stays unread.
    DeliveryFailed {
        id: MessageId,
        signal: Signal,
        discarded: usize,
        reason: String,
    },
}

impl CycleOutcome {
    /// Signal handed to the bot in this cycle, if any.
    #[must_use]
    pub const fn delivered(&self) -> Option<Signal> {
        match self {
            Self::Delivered { signal, .. } => Some(*signal),
            _ => None,
        }
    }
}

/// The poll cycle controller.
pub struct SignalRelay {
    sender: String,
    limiter: RateLimiter,
    delivery: Arc<dyn SignalDelivery>,
    bus: EventBus,
}

impl SignalRelay {
    pub fn new(
        sender: impl Into<String>,
        limiter: RateLimiter,
        delivery: Arc<dyn SignalDelivery>,
        bus: EventBus,
    ) -> Self {
        Self {
            sender: sender.into(),
            limiter,
            delivery,
            bus,
        }
    }

    #[must_use]
    pub const fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    #[must_use]
    pub const fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Run one poll cycle.
    ///
    /// # Errors
    ///
    /// Returns an error only for connection faults: a failed keepalive probe,
    /// search or fetch. Nothing is flagged when the cycle fails. Messages
    /// that cannot be decoded are recorded as events and skipped.
    pub async fn run_cycle<S>(&self, session: &mut S, state: &mut RelayState) -> Result<CycleOutcome>
    where
        S: MailSession + ?Sized,
    {
        let now = self.bus.now();
        let today = self.limiter.today(now);
        if self.limiter.roll_over(state, today) {
            self.bus.emit(state, Event::CounterReset { date: today });
        }

        session.probe().await?;

        let mut candidates = session
            .search(&SearchQuery::unseen_from(&self.sender))
            .await?;
        if candidates.is_empty() {
            return Ok(CycleOutcome::Idle);
        }
        candidates.sort_unstable();
        if candidates.len() > 1 {
            self.bus.emit(
                state,
                Event::BatchDetected {
                    count: candidates.len(),
                },
            );
        }

        let selected = self.select(session, state, &candidates).await?;

        let mut discarded = 0;
        for &id in &candidates {
            if selected.is_some_and(|(chosen, _)| chosen == id) {
                continue;
            }
            if self.mark_seen(session, state, id).await {
                self.bus.emit(state, Event::CandidateDiscarded { id });
            }
            discarded += 1;
        }

        let Some((id, signal)) = selected else {
            return Ok(CycleOutcome::NoSignal { discarded });
        };
        self.bus.emit(state, Event::SignalSelected { id, signal });

        if !self.limiter.admit(id, signal, state, &self.bus).await.is_admitted() {
            self.mark_seen(session, state, id).await;
            return Ok(CycleOutcome::RateLimited {
                id,
                signal,
                discarded,
            });
        }

        let reason = match self.delivery.deliver(signal).await {
            Ok(response) if response.is_accepted() => {
                self.mark_delivered(session, state, id).await;
                state.counter_mut().increment();
                let daily_count = state.daily_count();
                state.record_sent(
                    now,
                    SentSignal {
                        id,
                        signal,
                        daily_count,
                    },
                );
                self.bus.emit(
                    state,
                    Event::SignalDelivered(SignalEvent {
                        id,
                        signal,
                        daily_count,
                        cap: self.limiter.cap(),
                    }),
                );
                return Ok(CycleOutcome::Delivered {
                    id,
                    signal,
                    discarded,
                });
            }
            Ok(response) => {
                let body: String = response.body.chars().take(MAX_REASON_BODY).collect();
                format!("HTTP {}: {}", response.status, body.trim())
            }
            Err(err) => err.to_string(),
        };

        self.bus.emit(
            state,
            Event::DeliveryFailed {
                id,
                signal,
                reason: reason.clone(),
            },
        );
        Ok(CycleOutcome::DeliveryFailed {
            id,
            signal,
            discarded,
            reason,
        })
    }

    /// Re-derive today's count from messages delivered today.
    ///
    /// Counts messages from the sender dated today that carry the delivered
    /// mark. Discarded candidates and capped signals are read but unmarked.
    ///
    /// # Errors
    ///
    /// Returns an error if the search fails.
    pub async fn restore_daily_count<S>(&self, session: &mut S, state: &mut RelayState) -> Result<u32>
    where
        S: MailSession + ?Sized,
    {
        let today = self.limiter.today(self.bus.now());
        let ids = session
            .search(&SearchQuery::delivered_from_on(&self.sender, today))
            .await?;
        let count = u32::try_from(ids.len()).unwrap_or(u32::MAX);

        state.counter_mut().restore(count, today);
        self.bus.emit(state, Event::CounterRestored { count, date: today });
        Ok(count)
    }

    /// Number of unread alerts currently waiting.
    ///
    /// # Errors
    ///
    /// Returns an error if the search fails.
    pub async fn pending<S>(&self, session: &mut S) -> Result<usize>
    where
        S: MailSession + ?Sized,
    {
        let ids = session
            .search(&SearchQuery::unseen_from(&self.sender))
            .await?;
        Ok(ids.len())
    }

    /// Walk candidates newest first and stop at the first signal.
    ///
    /// A failed fetch ends the cycle before anything is flagged.
    async fn select<S>(
        &self,
        session: &mut S,
        state: &mut RelayState,
        candidates: &[MessageId],
    ) -> Result<Option<(MessageId, Signal)>>
    where
        S: MailSession + ?Sized,
    {
        for &id in candidates.iter().rev() {
            let raw = session.fetch_body(id).await?;
            match classify(&raw) {
                Extraction::Signal(signal) => return Ok(Some((id, signal))),
                Extraction::NoSignal => debug!(message = %id, "No signal in message"),
                Extraction::Failed(reason) => {
                    self.bus.emit(state, Event::ExtractionFailed { id, reason });
                }
            }
        }
        Ok(None)
    }

    /// Flag one message read. Failures are recorded, never propagated.
    async fn mark_seen<S>(&self, session: &mut S, state: &mut RelayState, id: MessageId) -> bool
    where
        S: MailSession + ?Sized,
    {
        let result = session.flag_seen(id).await;
        self.settle_flag(state, id, result)
    }

    /// Flag a delivered message read and delivered.
    async fn mark_delivered<S>(&self, session: &mut S, state: &mut RelayState, id: MessageId) -> bool
    where
        S: MailSession + ?Sized,
    {
        let result = session.flag_delivered(id).await;
        self.settle_flag(state, id, result)
    }

    fn settle_flag(&self, state: &mut RelayState, id: MessageId, result: Result<()>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                self.bus.emit(
                    state,
                    Event::FlagFailed {
                        id,
                        reason: e.to_string(),
                    },
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::fixture::RelayFixture;
    use crate::testkit::{email, SENDER};

    #[tokio::test]
    async fn empty_mailbox_is_idle() {
        let fx = RelayFixture::new(10);
        let mut state = fx.state();

        let outcome = fx.relay.run_cycle(&mut fx.session(), &mut state).await.unwrap();

        assert_eq!(outcome, CycleOutcome::Idle);
        assert!(fx.mailbox.fetched().is_empty());
        assert!(fx.delivery.delivered().is_empty());
    }

    #[tokio::test]
    async fn other_senders_are_ignored() {
        let fx = RelayFixture::new(10);
        let stranger = fx
            .mailbox
            .deliver("friend@example.com", email::plain("BUY"), fx.today());
        let mut state = fx.state();

        let outcome = fx.relay.run_cycle(&mut fx.session(), &mut state).await.unwrap();

        assert_eq!(outcome, CycleOutcome::Idle);
        assert!(!fx.mailbox.is_seen(stranger));
    }

    #[tokio::test]
    async fn rejection_reason_quotes_a_bounded_body() {
        let fx = RelayFixture::new(10);
        let id = fx.alert("BUY");
        fx.delivery.respond(500, &"x".repeat(1000));
        let mut state = fx.state();

        let outcome = fx.relay.run_cycle(&mut fx.session(), &mut state).await.unwrap();

        let CycleOutcome::DeliveryFailed { reason, .. } = outcome else {
            panic!("expected a delivery failure, got {outcome:?}");
        };
        assert!(reason.starts_with("HTTP 500: "));
        assert_eq!(reason.len(), "HTTP 500: ".len() + MAX_REASON_BODY);
        assert!(!fx.mailbox.is_seen(id));
        assert_eq!(state.daily_count(), 0);
    }

    #[tokio::test]
    async fn flag_failure_on_a_discarded_message_is_recorded() {
        let fx = RelayFixture::new(10);
        let old = fx.alert("SELL");
        let new = fx.alert("BUY");
        fx.mailbox.fail_flag(old);
        let mut state = fx.state();

        let outcome = fx.relay.run_cycle(&mut fx.session(), &mut state).await.unwrap();

        assert_eq!(
            outcome,
            CycleOutcome::Delivered {
                id: new,
                signal: Signal::Buy,
                discarded: 1
            }
        );
        assert_eq!(
            fx.events
                .count(|e| matches!(e, Event::FlagFailed { id, .. } if *id == old)),
            1
        );
        assert_eq!(state.alerts().len(), 1);
    }

    #[tokio::test]
    async fn failed_fetch_aborts_the_cycle_without_flagging() {
        let fx = RelayFixture::new(10);
        let older = fx.alert("SELL");
        let newest = fx.alert("BUY");
        fx.mailbox.fail_fetch(newest);
        let mut state = fx.state();

        let result = fx.relay.run_cycle(&mut fx.session(), &mut state).await;

        assert!(result.is_err());
        assert!(fx.delivery.delivered().is_empty());
        assert!(fx.mailbox.flagged().is_empty());
        assert_eq!(fx.mailbox.unseen(), vec![older, newest]);
        assert_eq!(state.daily_count(), 0);
    }

    #[tokio::test]
    async fn delivered_message_carries_the_delivered_mark() {
        let fx = RelayFixture::new(10);
        let old = fx.alert("SELL");
        let new = fx.alert("BUY");
        let mut state = fx.state();

        fx.relay.run_cycle(&mut fx.session(), &mut state).await.unwrap();

        assert!(fx.mailbox.is_delivered(new));
        assert!(fx.mailbox.is_seen(old));
        assert!(!fx.mailbox.is_delivered(old));
    }

    #[tokio::test]
    async fn restore_counts_only_todays_delivered_signals() {
        let fx = RelayFixture::new(10);
        fx.relayed_alert("BUY");
        fx.relayed_alert("SELL");
        fx.read_alert("BUY");
        fx.read_alert("no keyword");
        fx.mailbox.deliver_relayed(
            SENDER,
            email::plain("BUY"),
            fx.today().pred_opt().unwrap(),
        );
        fx.alert("BUY");
        let mut state = fx.state();

        let count = fx
            .relay
            .restore_daily_count(&mut fx.session(), &mut state)
            .await
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(state.daily_count(), 2);
        assert_eq!(
            fx.events
                .count(|e| matches!(e, Event::CounterRestored { count: 2, .. })),
            1
        );
    }

    #[tokio::test]
    async fn restore_after_a_batch_counts_one_send() {
        let fx = RelayFixture::new(2);
        for _ in 0..4 {
            fx.alert("BUY");
        }
        let mut state = fx.state();

        let outcome = fx.relay.run_cycle(&mut fx.session(), &mut state).await.unwrap();
        assert!(matches!(outcome, CycleOutcome::Delivered { discarded: 3, .. }));

        let mut reconnected = fx.state();
        let count = fx
            .relay
            .restore_daily_count(&mut fx.session(), &mut reconnected)
            .await
            .unwrap();
        assert_eq!(count, 1);

        let next = fx.alert("BUY");
        let outcome = fx
            .relay
            .run_cycle(&mut fx.session(), &mut reconnected)
            .await
            .unwrap();
        assert_eq!(
            outcome,
            CycleOutcome::Delivered {
                id: next,
                signal: Signal::Buy,
                discarded: 0
            }
        );
        assert_eq!(reconnected.daily_count(), 2);
    }

    #[tokio::test]
    async fn pending_counts_unread_alerts() {
        let fx = RelayFixture::new(10);
        fx.alert("BUY");
        fx.alert("nothing");
        fx.relayed_alert("SELL");

        let pending = fx.relay.pending(&mut fx.session()).await.unwrap();

        assert_eq!(pending, 2);
    }
}
