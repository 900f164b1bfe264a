//! Connection supervisor.
//!
//! Owns the outer loop of the relay:
//!
//! ```text
//! Disconnected -> Connecting -> Connected -> Polling
//!                     ^                         |
//!                     +------- Faulted <--------+
//! ```
//!
//! Any state moves to `Shutdown` when a stop request is observed: between
//! cycles, while connecting, or during any sleep. Faults never end the loop;
//! they only schedule a reconnect after the current backoff delay.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::application::backoff::Backoff;
use crate::application::poll::SignalRelay;
use crate::application::state::RelayState;
use crate::error::Error;
use crate::port::{Event, MailConnector, MailSession};

/// Lifecycle of the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Disconnected,
    Connecting,
    Connected,
    Polling,
    Faulted,
    Shutdown,
}

impl SupervisorState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Polling => "polling",
            Self::Faulted => "faulted",
            Self::Shutdown => "shutdown",
        }
    }
}

/// Why a connected session ended.
enum SessionEnd {
    Shutdown,
    Fault(Error),
}

/// Supervises mailbox sessions and drives poll cycles.
pub struct Supervisor<C: MailConnector> {
    connector: C,
    relay: SignalRelay,
    backoff: Backoff,
    poll_interval: Duration,
    state: RelayState,
    phase: SupervisorState,
}

impl<C: MailConnector> Supervisor<C> {
    pub fn new(
        connector: C,
        relay: SignalRelay,
        backoff: Backoff,
        poll_interval: Duration,
        state: RelayState,
    ) -> Self {
        Self {
            connector,
            relay,
            backoff,
            poll_interval,
            state,
            phase: SupervisorState::Disconnected,
        }
    }

    /// Run until a stop request arrives, then return the session state.
    ///
    /// A closed shutdown channel counts as a stop request.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> RelayState {
        loop {
            if stop_requested(&shutdown) {
                break;
            }

            self.enter(SupervisorState::Connecting);
            self.emit(Event::Connecting {
                host: self.connector.host().to_string(),
            });
            let connected = tokio::select! {
                biased;
                () = stopped(&mut shutdown) => break,
                result = self.connector.connect() => result,
            };

            match connected {
                Ok(mut session) => {
                    self.enter(SupervisorState::Connected);
                    self.backoff.reset();
                    self.emit(Event::Connected {
                        host: self.connector.host().to_string(),
                    });

                    let end = self.serve(&mut session, &mut shutdown).await;
                    session.close().await;
                    match end {
                        SessionEnd::Shutdown => break,
                        SessionEnd::Fault(err) => self.emit(Event::ConnectionLost {
                            reason: err.to_string(),
                        }),
                    }
                }
                Err(err) => self.emit(Event::ConnectFailed {
                    reason: err.to_string(),
                }),
            }

            self.enter(SupervisorState::Faulted);
            let delay = self.backoff.next_delay();
            self.emit(Event::ReconnectScheduled {
                delay,
                attempt: self.backoff.attempts(),
            });
            tokio::select! {
                biased;
                () = stopped(&mut shutdown) => break,
                () = sleep(delay) => {}
            }
        }

        self.enter(SupervisorState::Shutdown);
        self.emit(Event::ShuttingDown);
        info!(
            daily_count = self.state.daily_count(),
            sent = self.state.sent().len(),
            "Supervisor stopped"
        );
        self.state
    }

    /// Restore the counter, then poll until a fault or a stop request.
    async fn serve(
        &mut self,
        session: &mut C::Session,
        shutdown: &mut watch::Receiver<bool>,
    ) -> SessionEnd {
        if let Err(err) = self
            .relay
            .restore_daily_count(session, &mut self.state)
            .await
        {
            return SessionEnd::Fault(err);
        }

        self.enter(SupervisorState::Polling);
        loop {
            if stop_requested(shutdown) {
                return SessionEnd::Shutdown;
            }

            match self.relay.run_cycle(session, &mut self.state).await {
                Ok(outcome) => debug!(?outcome, "Poll cycle complete"),
                Err(err) => return SessionEnd::Fault(err),
            }

            tokio::select! {
                biased;
                () = stopped(shutdown) => return SessionEnd::Shutdown,
                () = sleep(self.poll_interval) => {}
            }
        }
    }

    fn emit(&mut self, event: Event) {
        self.relay.bus().emit(&mut self.state, event);
    }

    fn enter(&mut self, next: SupervisorState) {
        if self.phase != next {
            debug!(from = self.phase.as_str(), to = next.as_str(), "Supervisor state");
            self.phase = next;
        }
    }
}

fn stop_requested(shutdown: &watch::Receiver<bool>) -> bool {
    *shutdown.borrow()
}

/// Resolves once a stop is requested or the sender is gone.
async fn stopped(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}
