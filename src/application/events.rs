//! Event emission shared by the relay services.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::state::RelayState;
use crate::port::{Clock, Event, NotifierRegistry};

/// Timestamps events, records them in the state and broadcasts them.
#[derive(Clone)]
pub struct EventBus {
    notifiers: Arc<NotifierRegistry>,
    clock: Arc<dyn Clock>,
}

impl EventBus {
    pub fn new(notifiers: Arc<NotifierRegistry>, clock: Arc<dyn Clock>) -> Self {
        Self { notifiers, clock }
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn emit(&self, state: &mut RelayState, event: Event) {
        state.record(self.clock.now(), &event);
        self.notifiers.notify_all(&event);
    }
}
