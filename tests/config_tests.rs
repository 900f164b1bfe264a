//! Configuration parsing and validation.

use std::fs;

use mailsignal::adapter::outbound::webhook::WebhookTarget;
use mailsignal::error::{ConfigError, Error};
use mailsignal::infrastructure::config::Config;

const EXAMPLE: &str = include_str!("../config.toml.example");

const MINIMAL: &str = r#"
[mailbox]
host = "imap.mail.me.com"
account = "trader@icloud.com"
"#;

fn with(extra: &str) -> String {
    format!("{MINIMAL}\n{extra}")
}

fn invalid_field(result: Result<Config, Error>) -> &'static str {
    match result {
        Err(Error::Config(ConfigError::InvalidValue { field, .. })) => field,
        Err(Error::Config(ConfigError::MissingField { field })) => field,
        other => panic!("expected a field error, got {other:?}"),
    }
}

#[test]
fn example_config_is_valid() {
    let config = Config::parse_toml(EXAMPLE).unwrap();

    assert_eq!(config.mailbox.host, "imap.mail.me.com");
    assert_eq!(config.mailbox.sender, "noreply@tradingview.com");
    assert_eq!(config.webhook.token_header, "X-WEBHOOK-TOKEN");
    assert!(!config.alert.enabled);
}

#[test]
fn minimal_config_uses_defaults() {
    let config = Config::parse_toml(MINIMAL).unwrap();

    assert_eq!(config.mailbox.port, 993);
    assert_eq!(config.mailbox.folder, "INBOX");
    assert_eq!(config.mailbox.sender, "noreply@tradingview.com");
    assert_eq!(
        config.webhook.url(WebhookTarget::Local).unwrap(),
        "http://127.0.0.1:5001/webhook"
    );
    assert_eq!(config.limits.daily_cap, 10);
    assert_eq!(config.polling.interval_secs, 10);
    assert_eq!(config.reconnection.initial_delay_secs, 10);
    assert_eq!(config.reconnection.max_delay_secs, 300);
    assert_eq!(config.history.events, 200);
    assert_eq!(config.logging.format, "pretty");
}

#[test]
fn public_mode_needs_a_public_url() {
    let config = Config::parse_toml(MINIMAL).unwrap();
    assert!(matches!(
        config.webhook.url(WebhookTarget::Public),
        Err(Error::Config(ConfigError::MissingField {
            field: "webhook.public_url"
        }))
    ));

    let config = Config::parse_toml(&with(
        "[webhook]\npublic_url = \"https://relay.example.com/webhook\"\n",
    ))
    .unwrap();
    assert_eq!(
        config.webhook.url(WebhookTarget::Public).unwrap(),
        "https://relay.example.com/webhook"
    );
}

#[test]
fn missing_mailbox_section_is_a_parse_error() {
    let result = Config::parse_toml("[polling]\ninterval_secs = 5\n");
    assert!(matches!(result, Err(Error::Config(ConfigError::Parse(_)))));
}

#[test]
fn empty_host_is_reported() {
    let result = Config::parse_toml("[mailbox]\nhost = \"\"\naccount = \"a@b.c\"\n");
    assert_eq!(invalid_field(result), "mailbox.host");
}

#[test]
fn sender_cannot_break_out_of_the_search() {
    let result = Config::parse_toml(
        "[mailbox]\nhost = \"h\"\naccount = \"a\"\nsender = \"x\\\" OR ALL\"\n",
    );
    assert_eq!(invalid_field(result), "mailbox.sender");
}

#[test]
fn zero_interval_is_rejected() {
    let result = Config::parse_toml(&with("[polling]\ninterval_secs = 0\n"));
    assert_eq!(invalid_field(result), "polling.interval_secs");
}

#[test]
fn oversized_history_is_rejected() {
    let result = Config::parse_toml(&with("[history]\nevents = 9223372036854775807\n"));
    assert_eq!(invalid_field(result), "history.events");

    let config = Config::parse_toml(&with("[history]\nevents = 0\n")).unwrap();
    assert_eq!(config.history.events, 0);
}

#[test]
fn huge_timeouts_are_rejected() {
    let result = Config::parse_toml(
        "[mailbox]\nhost = \"h\"\naccount = \"a\"\ntimeout_secs = 9223372036854775807\n",
    );
    assert_eq!(invalid_field(result), "mailbox.timeout_secs");

    let result = Config::parse_toml(&with("[webhook]\ntimeout_secs = 86400\n"));
    assert_eq!(invalid_field(result), "webhook.timeout_secs");
}

#[test]
fn backoff_ceiling_below_floor_is_rejected() {
    let result = Config::parse_toml(&with(
        "[reconnection]\ninitial_delay_secs = 60\nmax_delay_secs = 30\n",
    ));
    assert_eq!(invalid_field(result), "reconnection.max_delay_secs");
}

#[test]
fn utc_offset_must_be_a_valid_zone() {
    let result = Config::parse_toml(&with("[limits]\nutc_offset_minutes = 1440\n"));
    assert_eq!(invalid_field(result), "limits.utc_offset_minutes");

    let config = Config::parse_toml(&with("[limits]\nutc_offset_minutes = -300\n")).unwrap();
    assert_eq!(config.zone().local_minus_utc(), -300 * 60);
}

#[test]
fn bad_webhook_url_is_rejected() {
    let result = Config::parse_toml(&with("[webhook]\nlocal_url = \"not a url\"\n"));
    assert_eq!(invalid_field(result), "webhook.local_url");
}

#[test]
fn enabled_alerts_need_smtp_settings() {
    let result = Config::parse_toml(&with("[alert]\nenabled = true\nto = \"ops@example.com\"\n"));
    assert_eq!(invalid_field(result), "alert.smtp_host");
}

#[test]
fn unknown_log_format_is_rejected() {
    let result = Config::parse_toml(&with("[logging]\nformat = \"xml\"\n"));
    assert_eq!(invalid_field(result), "logging.format");
}

#[test]
fn load_reports_missing_file() {
    let result = Config::load("/nonexistent/mailsignal/config.toml");
    assert!(matches!(result, Err(Error::Config(ConfigError::ReadFile(_)))));
}

#[test]
fn load_reads_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, with("[limits]\ndaily_cap = 3\n")).unwrap();

    let config = Config::load(&path).unwrap();

    assert_eq!(config.limits.daily_cap, 3);
}
