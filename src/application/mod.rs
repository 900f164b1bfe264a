//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the relay: extraction, rate limiting, poll cycles and
//! connection supervision.

pub mod backoff;
pub mod events;
pub mod extractor;
pub mod limiter;
pub mod poll;
pub mod state;
pub mod supervisor;

pub use backoff::Backoff;
pub use events::EventBus;
pub use extractor::classify;
pub use limiter::{Admission, RateLimiter};
pub use poll::{CycleOutcome, SignalRelay};
pub use state::{HistoryLimits, RelayState, SentSignal};
pub use supervisor::{Supervisor, SupervisorState};
