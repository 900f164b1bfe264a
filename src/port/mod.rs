//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture.
//! They are traits that adapters implement to integrate with external
//! systems (mail server, trading bot webhook, SMTP relay, terminal).
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │                         │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              │                         │              │
//!     │              └─────────────────────────┘              │
//!     │                         │                             │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │ Mailbox │            │  Delivery   │              │  Alert /  │
//! │ Adapter │            │  Adapter    │              │ Notifier  │
//! └─────────┘            └─────────────┘              └───────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`MailConnector`], [`MailSession`] - Mailbox access
//! - [`SignalDelivery`] - Webhook delivery
//! - [`AlertSender`] - Out-of-band operator alerts
//! - [`Clock`] - Time source
//! - [`Notifier`] - Event notifications (log, terminal)

pub mod outbound;

pub use outbound::alert::{AlertSender, NullAlertSender};
pub use outbound::clock::{Clock, SystemClock};
pub use outbound::delivery::{DeliveryResponse, SignalDelivery};
pub use outbound::mailbox::{MailConnector, MailSession};
pub use outbound::notifier::{
    Event, LogNotifier, Notifier, NotifierRegistry, NullNotifier, SignalEvent,
};
