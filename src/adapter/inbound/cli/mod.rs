//! CLI module graph.

pub mod check;
pub mod command;
pub mod dispatch;
pub mod display;
pub mod output;
pub mod paths;
pub mod run;
