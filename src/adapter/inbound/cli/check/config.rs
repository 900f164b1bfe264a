use std::path::Path;

use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::config::Config;

/// Validate configuration file without starting the relay.
pub fn execute_config<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let path = config_path.as_ref();
    let config = Config::load(path)?;

    output::section("Configuration Check");
    output::field("Config", path.display());
    output::success("Configuration file is valid");

    output::section("Summary");
    output::field("Mailbox", format!("{}:{}", config.mailbox.host, config.mailbox.port));
    output::field("Account", &config.mailbox.account);
    output::field("Folder", &config.mailbox.folder);
    output::field("Sender", &config.mailbox.sender);
    output::field("Local URL", &config.webhook.local_url);
    output::field(
        "Public URL",
        config.webhook.public_url.as_deref().unwrap_or("not set"),
    );
    output::field("Daily cap", config.limits.daily_cap);
    output::field("UTC offset", config.zone());

    for missing in missing_secrets(&config) {
        output::warning(&format!("{missing} is not set"));
    }

    if config.alert.enabled {
        output::field("Alerts", &config.alert.to);
    } else {
        output::field("Alerts", "disabled");
    }

    output::success("Configuration check complete");

    Ok(())
}

/// Environment secrets the relay will need but cannot find.
fn missing_secrets(config: &Config) -> Vec<&'static str> {
    use crate::infrastructure::config::settings::{
        MAIL_PASSWORD_ENV, SMTP_PASSWORD_ENV, WEBHOOK_TOKEN_ENV,
    };

    let mut missing = Vec::new();
    if config.mailbox.password.is_none() {
        missing.push(MAIL_PASSWORD_ENV);
    }
    if config.webhook.token.is_none() {
        missing.push(WEBHOOK_TOKEN_ENV);
    }
    if config.alert.enabled && config.alert.password.is_none() {
        missing.push(SMTP_PASSWORD_ENV);
    }
    missing
}
