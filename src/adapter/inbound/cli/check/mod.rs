//! Diagnostic check command handlers.

pub mod alert;
pub mod config;
pub mod mailbox;
