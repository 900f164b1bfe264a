//! Infrastructure configuration modules.

pub mod limits;
pub mod logging;
pub mod reconnection;
pub mod settings;

pub use settings::Config;
