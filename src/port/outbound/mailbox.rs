//! Mail transport port.
//!
//! The relay drives a mailbox through two traits: a [`MailConnector`] that
//! opens authenticated sessions, and the [`MailSession`] it returns. A
//! session is used by one poll cycle at a time.

use async_trait::async_trait;

use crate::domain::{MessageId, SearchQuery};
use crate::error::Result;

/// Opens authenticated mailbox sessions with the folder already selected.
#[async_trait]
pub trait MailConnector: Send + Sync {
    /// Session type produced by this connector.
    type Session: MailSession;

    /// Connect, authenticate and select the watched folder.
    async fn connect(&self) -> Result<Self::Session>;

    /// Server host, for display.
    fn host(&self) -> &str;
}

/// A live mailbox session.
#[async_trait]
pub trait MailSession: Send {
    /// Lightweight keepalive; an error means the connection is gone.
    async fn probe(&mut self) -> Result<()>;

    /// Ids matching `query`, oldest first.
    async fn search(&mut self, query: &SearchQuery) -> Result<Vec<MessageId>>;

    /// Raw RFC 822 bytes of a message, without marking it read.
    async fn fetch_body(&mut self, id: MessageId) -> Result<Vec<u8>>;

    /// Flag a message as read.
    async fn flag_seen(&mut self, id: MessageId) -> Result<()>;

    /// Flag a message as read and mark it as handed to the bot.
    ///
    /// Only marked messages count when the daily total is re-derived.
    async fn flag_delivered(&mut self, id: MessageId) -> Result<()>;

    /// Unselect and log out. Errors are swallowed.
    async fn close(&mut self);
}
