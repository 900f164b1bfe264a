//! Reconnection backoff and history sizing.

use std::time::Duration;

use serde::Deserialize;

use crate::application::{Backoff, HistoryLimits};

/// Backoff between mailbox reconnection attempts.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconnectionConfig {
    /// First delay after a failure, and the delay after any successful connect.
    #[serde(default = "default_initial_delay_secs")]
    pub initial_delay_secs: u64,
    /// Upper bound for the doubling delay.
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: u64,
}

impl ReconnectionConfig {
    #[must_use]
    pub fn backoff(&self) -> Backoff {
        Backoff::new(
            Duration::from_secs(self.initial_delay_secs),
            Duration::from_secs(self.max_delay_secs),
        )
    }
}

impl Default for ReconnectionConfig {
    fn default() -> Self {
        Self {
            initial_delay_secs: default_initial_delay_secs(),
            max_delay_secs: default_max_delay_secs(),
        }
    }
}

const fn default_initial_delay_secs() -> u64 {
    10
}

const fn default_max_delay_secs() -> u64 {
    300
}

/// Capacities of the in-memory display histories.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_signals")]
    pub signals: usize,
    #[serde(default = "default_events")]
    pub events: usize,
    #[serde(default = "default_alerts")]
    pub alerts: usize,
}

impl HistoryConfig {
    #[must_use]
    pub const fn limits(&self) -> HistoryLimits {
        HistoryLimits {
            signals: self.signals,
            events: self.events,
            alerts: self.alerts,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        let limits = HistoryLimits::default();
        Self {
            signals: limits.signals,
            events: limits.events,
            alerts: limits.alerts,
        }
    }
}

fn default_signals() -> usize {
    HistoryLimits::default().signals
}

fn default_events() -> usize {
    HistoryLimits::default().events
}

fn default_alerts() -> usize {
    HistoryLimits::default().alerts
}
