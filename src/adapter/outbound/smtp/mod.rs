//! SMTP alert adapter.

mod sender;
pub mod settings;

pub use sender::SmtpAlertSender;
pub use settings::AlertConfig;
