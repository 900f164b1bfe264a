//! Path utilities for mailsignal.
//!
//! Configuration lives under `~/.mailsignal/config.toml` unless `--config`
//! says otherwise.

use std::path::PathBuf;

/// Returns the mailsignal home directory (`~/.mailsignal/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".mailsignal")
}

/// Returns the default config file path (`~/.mailsignal/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_is_under_mailsignal_home() {
        let config = default_config();

        assert!(config.starts_with(home_dir()));
        assert!(config.to_string_lossy().contains(".mailsignal"));
        assert_eq!(config.file_name().and_then(|n| n.to_str()), Some("config.toml"));
    }
}
