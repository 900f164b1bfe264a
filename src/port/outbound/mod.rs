//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the relay's infrastructure dependencies: the
//! mailbox, the webhook, the alert channel, the clock and event sinks.

pub mod alert;
pub mod clock;
pub mod delivery;
pub mod mailbox;
pub mod notifier;
