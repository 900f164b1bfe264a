//! Command-line interface definitions.
//!
//! Defines the CLI structure for the mailsignal relay using `clap`.
//! The CLI runs the relay in the foreground and offers diagnostic checks
//! for the configuration, the mailbox and the alert channel.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use super::paths;
use crate::adapter::outbound::webhook::WebhookTarget;

/// Relay TradingView alert emails to a trading bot webhook
#[derive(Parser, Debug)]
#[command(name = "mailsignal")]
#[command(version)]
pub struct Cli {
    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the mailsignal CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the relay (foreground, stops on Ctrl-C)
    Run(RunArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `mailsignal check`.
///
/// Verifies each external dependency before running the relay.
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate the configuration file syntax and semantics.
    Config(ConfigPathArg),
    /// Log in to the mailbox and count waiting alerts.
    Mailbox(ConfigPathArg),
    /// Send a test alert email.
    Alert(ConfigPathArg),
}

/// Which webhook endpoint receives signals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RunMode {
    /// Bot on this machine
    Local,
    /// Bot behind a public tunnel
    Public,
}

impl From<RunMode> for WebhookTarget {
    fn from(mode: RunMode) -> Self {
        match mode {
            RunMode::Local => Self::Local,
            RunMode::Public => Self::Public,
        }
    }
}

/// Shared argument struct for commands that require only a configuration path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to the configuration file.
    #[arg(short, long, default_value_os_t = paths::default_config())]
    pub config: PathBuf,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Webhook endpoint to deliver signals to.
    #[arg(long, value_enum)]
    pub mode: RunMode,

    /// Path to the configuration file.
    #[arg(short, long, default_value_os_t = paths::default_config())]
    pub config: PathBuf,

    /// Override log level (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty-printed logs.
    #[arg(long)]
    pub json_logs: bool,
}
