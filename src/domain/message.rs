//! Mailbox message identifiers and search criteria.

use std::fmt;

use chrono::NaiveDate;

/// Mailbox-assigned message identifier (an IMAP UID).
///
/// UIDs grow with arrival order inside a mailbox, so sorting them gives
/// oldest-first order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(u32);

impl MessageId {
    #[must_use]
    pub const fn new(uid: u32) -> Self {
        Self(uid)
    }

    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl From<u32> for MessageId {
    fn from(uid: u32) -> Self {
        Self(uid)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which read state a search should match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeenFilter {
    Unseen,
    Seen,
}

/// Criteria for a mailbox search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Sender address the messages must come from.
    pub from: String,
    /// Read state filter.
    pub seen: SeenFilter,
    /// Only messages carrying the delivered mark.
    pub delivered: bool,
    /// Restrict to messages whose Date header falls on this day.
    pub sent_on: Option<NaiveDate>,
}

impl SearchQuery {
    /// Unread messages from `sender`: the signal candidates of a poll cycle.
    #[must_use]
    pub fn unseen_from(sender: &str) -> Self {
        Self {
            from: sender.to_string(),
            seen: SeenFilter::Unseen,
            delivered: false,
            sent_on: None,
        }
    }

    /// Messages from `sender` sent on `date` that were handed to the bot.
    ///
    /// Read alerts alone are not enough: discarded candidates and signals
    /// dropped by the cap are read too, but were never sent.
    #[must_use]
    pub fn delivered_from_on(sender: &str, date: NaiveDate) -> Self {
        Self {
            from: sender.to_string(),
            seen: SeenFilter::Seen,
            delivered: true,
            sent_on: Some(date),
        }
    }

    /// Render the query as an IMAP SEARCH criteria string.
    #[must_use]
    pub fn to_imap(&self) -> String {
        let flag = match self.seen {
            SeenFilter::Unseen => "UNSEEN",
            SeenFilter::Seen => "SEEN",
        };
        let mut criteria = flag.to_string();
        if self.delivered {
            criteria.push_str(" FLAGGED");
        }
        criteria.push_str(&format!(" FROM \"{}\"", self.from));
        if let Some(date) = self.sent_on {
            criteria.push_str(" SENTON ");
            criteria.push_str(&date.format("%d-%b-%Y").to_string());
        }
        criteria
    }
}
