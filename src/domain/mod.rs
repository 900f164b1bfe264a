//! Transport-agnostic domain types: signals, message ids, counters, histories.

pub mod counter;
pub mod history;
pub mod message;
pub mod signal;

pub use counter::{local_date, DailyCounter};
pub use history::{BoundedHistory, Stamped};
pub use message::{MessageId, SearchQuery, SeenFilter};
pub use signal::{Extraction, Signal};
