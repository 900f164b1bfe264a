//! A relay wired to in-memory fakes.

use std::sync::Arc;

use chrono::{FixedOffset, NaiveDate};

use super::doubles::{ManualClock, RecordingAlerts, RecordingDelivery, RecordingNotifier};
use super::mail::{FakeConnector, FakeMailbox, FakeSession};
use super::{email, SENDER};
use crate::application::{EventBus, HistoryLimits, RateLimiter, RelayState, SignalRelay};
use crate::domain::MessageId;
use crate::port::{Notifier, NotifierRegistry};

/// Every collaborator of a [`SignalRelay`], kept for assertions.
pub struct RelayFixture {
    pub mailbox: FakeMailbox,
    pub delivery: Arc<RecordingDelivery>,
    pub alerts: Arc<RecordingAlerts>,
    pub clock: Arc<ManualClock>,
    pub events: RecordingNotifier,
    pub relay: SignalRelay,
}

impl RelayFixture {
    /// UTC reference zone, clock at [`ManualClock::morning`].
    pub fn new(cap: u32) -> Self {
        Self::build(cap, FixedOffset::east_opt(0).unwrap(), Vec::new())
    }

    /// Like [`RelayFixture::new`] with extra notifiers registered.
    pub fn with_notifiers(cap: u32, extra: Vec<Box<dyn Notifier>>) -> Self {
        Self::build(cap, FixedOffset::east_opt(0).unwrap(), extra)
    }

    pub fn with_zone(cap: u32, zone: FixedOffset) -> Self {
        Self::build(cap, zone, Vec::new())
    }

    fn build(cap: u32, zone: FixedOffset, extra: Vec<Box<dyn Notifier>>) -> Self {
        let mailbox = FakeMailbox::new();
        let delivery = Arc::new(RecordingDelivery::new());
        let alerts = Arc::new(RecordingAlerts::new());
        let clock = Arc::new(ManualClock::morning());
        let events = RecordingNotifier::new();

        let mut registry = NotifierRegistry::new();
        registry.register(Box::new(events.clone()));
        for notifier in extra {
            registry.register(notifier);
        }

        let limiter = RateLimiter::new(cap, zone, alerts.clone());
        let bus = EventBus::new(Arc::new(registry), clock.clone());
        let relay = SignalRelay::new(SENDER, limiter, delivery.clone(), bus);

        Self {
            mailbox,
            delivery,
            alerts,
            clock,
            events,
            relay,
        }
    }

    /// Today in the limiter's reference zone.
    pub fn today(&self) -> NaiveDate {
        self.relay.limiter().today(self.relay.bus().now())
    }

    /// Fresh state for today with default history limits.
    pub fn state(&self) -> RelayState {
        RelayState::new(self.today(), HistoryLimits::default())
    }

    pub fn session(&self) -> FakeSession {
        self.mailbox.session()
    }

    pub fn connector(&self) -> FakeConnector {
        self.mailbox.connector()
    }

    /// Drop an unread plain-text alert dated today.
    pub fn alert(&self, body: &str) -> MessageId {
        self.mailbox
            .deliver(SENDER, email::plain(body), self.today())
    }

    /// Drop an already-read plain-text alert dated today that never reached
    /// the bot: a discarded candidate or a capped signal.
    pub fn read_alert(&self, body: &str) -> MessageId {
        self.mailbox
            .deliver_seen(SENDER, email::plain(body), self.today())
    }

    /// Drop a plain-text alert dated today that was already delivered.
    pub fn relayed_alert(&self, body: &str) -> MessageId {
        self.mailbox
            .deliver_relayed(SENDER, email::plain(body), self.today())
    }
}
