//! mailsignal - relay trading alert emails to a bot webhook.
//!
//! Watches a mailbox over IMAP for alert emails from a charting service,
//! extracts a BUY or SELL signal from the newest one, and forwards it as JSON
//! to a trading bot. A daily cap limits BUY signals; SELL always passes.
//!
//! # Architecture
//!
//! - **`domain`** - Signals, message ids, the daily counter, bounded histories
//! - **`port`** - Traits for the mailbox, webhook, alert channel, clock, notifiers
//! - **`application`** - Signal extraction, the poll cycle, the rate limiter,
//!   and the connection supervisor
//! - **`adapter`** - IMAP, webhook and SMTP implementations plus the CLI
//! - **`infrastructure`** - Configuration, wiring and interrupt handling
//!
//! # Example
//!
//! ```no_run
//! use mailsignal::adapter::outbound::webhook::WebhookTarget;
//! use mailsignal::infrastructure::{bootstrap, config::Config, runtime};
//!
//! # async fn example() -> mailsignal::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! config.logging.init();
//! let notifiers = bootstrap::build_notifier_registry(Vec::new());
//! let supervisor = bootstrap::build_supervisor(&config, WebhookTarget::Local, notifiers)?;
//! let state = runtime::run_until_interrupted(supervisor).await;
//! println!("{} signal(s) sent today", state.daily_count());
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
