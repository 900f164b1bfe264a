//! IMAP mailbox adapter.

mod session;
pub mod settings;

pub use session::{ImapConnector, ImapSession};
pub use settings::MailboxConfig;
