//! Daily signal counter keyed by a calendar date in a reference timezone.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

/// Calendar date of `now` in the reference timezone.
#[must_use]
pub fn local_date(now: DateTime<Utc>, zone: FixedOffset) -> NaiveDate {
    now.with_timezone(&zone).date_naive()
}

/// Number of signals sent on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyCounter {
    count: u32,
    date: NaiveDate,
}

impl DailyCounter {
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self { count: 0, date }
    }

    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Reset to zero when `today` differs from the stored date.
    ///
    /// Returns true if a reset happened.
    pub fn roll_over(&mut self, today: NaiveDate) -> bool {
        if self.date == today {
            return false;
        }
        self.date = today;
        self.count = 0;
        true
    }

    pub fn increment(&mut self) {
        self.count = self.count.saturating_add(1);
    }

    /// Overwrite with a count re-derived from the mailbox.
    pub fn restore(&mut self, count: u32, date: NaiveDate) {
        self.count = count;
        self.date = date;
    }
}
