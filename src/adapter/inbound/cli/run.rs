//! Handler for the `run` command.

use crate::adapter::inbound::cli::command::RunArgs;
use crate::adapter::inbound::cli::display::ConsoleNotifier;
use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::webhook::WebhookTarget;
use crate::application::RelayState;
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::Config;
use crate::infrastructure::runtime;

/// Alerts listed in the session summary.
const SUMMARY_ALERTS: usize = 5;

/// Execute the run command.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let mut config = Config::load(&args.config)?;
    apply_overrides(&mut config, args, output::is_json());
    config.logging.init();

    let target = WebhookTarget::from(args.mode);
    if !output::is_quiet() || output::is_json() {
        print_startup(&config, target)?;
    }

    let notifiers =
        bootstrap::build_notifier_registry(vec![Box::new(ConsoleNotifier::new(config.zone()))]);
    let supervisor = bootstrap::build_supervisor(&config, target, notifiers)?;

    let state = runtime::run_until_interrupted(supervisor).await;
    print_summary(&state, config.limits.daily_cap);
    Ok(())
}

fn apply_overrides(config: &mut Config, args: &RunArgs, force_json_logs: bool) {
    if let Some(level) = &args.log_level {
        config.logging.level.clone_from(level);
    }
    if args.json_logs || force_json_logs {
        config.logging.format = "json".to_string();
    }
}

fn print_startup(config: &Config, target: WebhookTarget) -> Result<()> {
    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Mode", target);
    output::field("Webhook", config.webhook.url(target)?);
    output::field("Mailbox", format!("{}:{}", config.mailbox.host, config.mailbox.port));
    output::field("Account", &config.mailbox.account);
    if output::verbosity() > 0 {
        output::field("Folder", &config.mailbox.folder);
        output::field("Sender", &config.mailbox.sender);
        output::field("Interval", format!("{}s", config.polling.interval_secs));
    }
    output::field("Daily cap", config.limits.daily_cap);
    if config.alert.enabled {
        output::field("Alerts", &config.alert.to);
    } else {
        output::field("Alerts", "disabled");
    }
    output::note("Press Ctrl-C to stop");
    Ok(())
}

fn print_summary(state: &RelayState, cap: u32) {
    output::section("Session summary");
    output::field("Today", format!("{}/{}", state.daily_count(), cap));
    output::field("Delivered", state.sent().len());
    if let Some(last) = state.sent().latest() {
        output::field(
            "Last signal",
            format!(
                "{} from message {} at {}",
                last.value.signal,
                last.value.id,
                last.at.format("%H:%M:%S UTC")
            ),
        );
    }
    output::field("Problems", state.alerts().len());
    for alert in state.alerts().iter().rev().take(SUMMARY_ALERTS) {
        output::warning(&format!("{} {}", alert.at.format("%H:%M:%S UTC"), alert.value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::inbound::cli::command::RunMode;
    use std::path::PathBuf;

    const MINIMAL: &str = r#"
        [mailbox]
        host = "imap.mail.me.com"
        account = "trader@icloud.com"
    "#;

    fn args(log_level: Option<&str>, json_logs: bool) -> RunArgs {
        RunArgs {
            mode: RunMode::Local,
            config: PathBuf::from("unused.toml"),
            log_level: log_level.map(str::to_string),
            json_logs,
        }
    }

    #[test]
    fn overrides_replace_logging_settings() {
        let mut config = Config::parse_toml(MINIMAL).unwrap();
        apply_overrides(&mut config, &args(Some("debug"), true), false);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn json_output_forces_json_logs() {
        let mut config = Config::parse_toml(MINIMAL).unwrap();
        apply_overrides(&mut config, &args(None, false), true);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn no_overrides_keep_file_values() {
        let mut config = Config::parse_toml(MINIMAL).unwrap();
        apply_overrides(&mut config, &args(None, false), false);
        assert_eq!(config.logging.format, "pretty");
    }
}
