//! Daily cap and polling cadence.

use std::time::Duration;

use chrono::FixedOffset;
use serde::Deserialize;

/// Daily signal cap.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum BUY signals per day. SELL is never blocked.
    #[serde(default = "default_daily_cap")]
    pub daily_cap: u32,
    /// Offset of the reference timezone in minutes east of UTC.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl LimitsConfig {
    /// Reference timezone, `None` if the offset is out of range.
    #[must_use]
    pub fn zone(&self) -> Option<FixedOffset> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            daily_cap: default_daily_cap(),
            utc_offset_minutes: 0,
        }
    }
}

const fn default_daily_cap() -> u32 {
    10
}

/// Poll loop cadence.
#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl PollingConfig {
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

const fn default_interval_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_accepts_negative_offsets() {
        let limits = LimitsConfig {
            daily_cap: 1,
            utc_offset_minutes: -300,
        };
        assert_eq!(limits.zone(), FixedOffset::west_opt(5 * 3600));
    }

    #[test]
    fn zone_rejects_a_full_day() {
        let limits = LimitsConfig {
            daily_cap: 1,
            utc_offset_minutes: 24 * 60,
        };
        assert!(limits.zone().is_none());
    }
}
