//! Entry point shared by the binary: global flags, then the subcommand.

use super::command::{CheckCommand, Cli, Commands};
use super::output::{self, OutputConfig};
use super::{check, run};
use crate::error::Result;

/// Apply global flags and run the selected command.
pub async fn dispatch(cli: Cli) -> Result<()> {
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));

    match cli.command {
        Commands::Run(args) => run::execute(&args).await,
        Commands::Check(CheckCommand::Config(arg)) => check::config::execute_config(&arg.config),
        Commands::Check(CheckCommand::Mailbox(arg)) => {
            check::mailbox::execute_mailbox(&arg.config).await
        }
        Commands::Check(CheckCommand::Alert(arg)) => check::alert::execute_alert(&arg.config).await,
    }
}
