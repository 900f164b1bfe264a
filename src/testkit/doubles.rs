//! Recording test doubles for the delivery, alert, clock and notifier ports.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tokio::sync::watch;

use crate::domain::Signal;
use crate::error::{Error, Result};
use crate::port::{AlertSender, Clock, DeliveryResponse, Event, Notifier, SignalDelivery};

/// Webhook double that records signals and replays scripted responses.
///
/// Responds `200 ok` once the script is exhausted.
#[derive(Default)]
pub struct RecordingDelivery {
    responses: Mutex<VecDeque<Result<DeliveryResponse>>>,
    delivered: Mutex<Vec<Signal>>,
}

impl RecordingDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with the given status.
    pub fn respond(&self, status: u16, body: &str) {
        self.responses.lock().unwrap().push_back(Ok(DeliveryResponse {
            status,
            body: body.to_string(),
        }));
    }

    /// Queue a transport failure.
    pub fn fail(&self, reason: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(Error::Mail(reason.to_string())));
    }

    /// Every signal posted, including rejected ones.
    pub fn delivered(&self) -> Vec<Signal> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl SignalDelivery for RecordingDelivery {
    async fn deliver(&self, signal: Signal) -> Result<DeliveryResponse> {
        self.delivered.lock().unwrap().push(signal);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(DeliveryResponse {
                    status: 200,
                    body: "ok".to_string(),
                })
            })
    }

    fn target(&self) -> &str {
        "http://bot.test/webhook"
    }
}

/// Alert double that records `(subject, body)` pairs.
#[derive(Default)]
pub struct RecordingAlerts {
    sent: Mutex<Vec<(String, String)>>,
    failing: Mutex<bool>,
}

impl RecordingAlerts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following send fail.
    pub fn fail_all(&self) {
        *self.failing.lock().unwrap() = true;
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl AlertSender for RecordingAlerts {
    async fn send_alert(&self, subject: &str, body: &str) -> Result<()> {
        if *self.failing.lock().unwrap() {
            return Err(Error::Alert("smtp relay unavailable".into()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((subject.to_string(), body.to_string()));
        Ok(())
    }
}

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// 2024-03-07 09:30:00 UTC.
    pub fn morning() -> Self {
        Self::new(Utc.with_ymd_and_hms(2024, 3, 7, 9, 30, 0).unwrap())
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Notifier that keeps every event. Clones share the same log.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    /// Number of recorded events matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&Event) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| predicate(e)).count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

type EventPredicate = Box<dyn Fn(&Event) -> bool + Send + Sync>;

/// Notifier that requests shutdown once `predicate` has matched `times` events.
pub struct StopWhen {
    shutdown: watch::Sender<bool>,
    predicate: EventPredicate,
    remaining: Mutex<usize>,
}

impl StopWhen {
    pub fn new(
        shutdown: watch::Sender<bool>,
        times: usize,
        predicate: impl Fn(&Event) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            shutdown,
            predicate: Box::new(predicate),
            remaining: Mutex::new(times),
        }
    }
}

impl Notifier for StopWhen {
    fn notify(&self, event: Event) {
        if !(self.predicate)(&event) {
            return;
        }
        let mut remaining = self.remaining.lock().unwrap();
        *remaining = remaining.saturating_sub(1);
        if *remaining == 0 {
            let _ = self.shutdown.send(true);
        }
    }
}
