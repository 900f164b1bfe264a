use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::smtp::SmtpAlertSender;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::Config;
use crate::port::AlertSender;

const TEST_SUBJECT: &str = "mailsignal test alert";
const TEST_BODY: &str = "This is a test alert from mailsignal. Rejected signals will be reported here.";

/// Send a test alert email.
pub async fn execute_alert<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let config = Config::load(config_path.as_ref())?;
    if !config.alert.enabled {
        return Err(ConfigError::InvalidValue {
            field: "alert.enabled",
            reason: "alerts are disabled; set enabled = true in [alert]".to_string(),
        }
        .into());
    }

    let sender = SmtpAlertSender::from_config(&config.alert)?;
    output::section("Alert Check");
    output::action("Sending", "test alert");
    sender.send_alert(TEST_SUBJECT, TEST_BODY).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "check.alert",
            "smtp_host": config.alert.smtp_host,
            "to": config.alert.to,
            "status": "sent",
        }));
        return Ok(());
    }

    output::action_done("Sent", "test alert");
    output::field("SMTP", format!("{}:{}", config.alert.smtp_host, config.alert.smtp_port));
    output::field("To", &config.alert.to);
    output::hint("check the inbox for the message");

    Ok(())
}
