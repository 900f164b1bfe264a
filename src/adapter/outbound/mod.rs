//! Outbound adapters (driven side).

pub mod imap;
pub mod smtp;
pub mod webhook;
