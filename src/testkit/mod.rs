//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`mail`] — In-memory [`MailConnector`](crate::port::MailConnector) and
//!   session with scripted failures: `FakeMailbox`, `FakeConnector`, `FakeSession`.
//! - [`doubles`] — Recording delivery, alert sender, notifier and a manual clock.
//! - [`email`] — Raw RFC 822 message builders.
//! - [`fixture`] — A fully wired `SignalRelay` over the fakes.

pub mod doubles;
pub mod email;
pub mod fixture;
pub mod mail;

/// Sender address used by every fake alert.
pub const SENDER: &str = "noreply@tradingview.com";
