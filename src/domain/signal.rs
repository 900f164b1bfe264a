//! Trade direction signals and per-message extraction outcomes.

use std::fmt;

use serde::Serialize;

/// A trade direction extracted from an alert email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
}

impl Signal {
    /// Look for a keyword in decoded message text.
    ///
    /// Matching is case-sensitive and `BUY` always takes precedence over
    /// `SELL`, so a text containing both yields [`Signal::Buy`].
    #[must_use]
    pub fn detect(text: &str) -> Option<Self> {
        if text.contains("BUY") {
            Some(Self::Buy)
        } else if text.contains("SELL") {
            Some(Self::Sell)
        } else {
            None
        }
    }

    /// Wire keyword for this signal.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }

    /// True for the closing action that may bypass the daily cap.
    #[must_use]
    pub const fn is_sell(self) -> bool {
        matches!(self, Self::Sell)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying one fetched message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// The message carries an actionable signal.
    Signal(Signal),
    /// The message decoded fine but names no keyword.
    NoSignal,
    /// The message could not be decoded into text.
    Failed(String),
}

impl Extraction {
    /// The extracted signal, if any.
    #[must_use]
    pub const fn signal(&self) -> Option<Signal> {
        match self {
            Self::Signal(signal) => Some(*signal),
            Self::NoSignal | Self::Failed(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_finds_buy() {
        assert_eq!(Signal::detect("Alert: BUY NOW"), Some(Signal::Buy));
    }

    #[test]
    fn detect_finds_sell() {
        assert_eq!(Signal::detect("strategy says SELL"), Some(Signal::Sell));
    }

    #[test]
    fn detect_without_keyword() {
        assert_eq!(Signal::detect("no keyword here"), None);
    }

    #[test]
    fn detect_is_case_sensitive() {
        assert_eq!(Signal::detect("buy the dip, then sell"), None);
    }

    #[test]
    fn buy_wins_over_sell() {
        assert_eq!(Signal::detect("SELL first, BUY later"), Some(Signal::Buy));
    }

    #[test]
    fn serializes_as_upper_case_keyword() {
        let json = serde_json::to_string(&Signal::Sell).unwrap();
        assert_eq!(json, "\"SELL\"");
    }

    #[test]
    fn extraction_signal_accessor() {
        assert_eq!(Extraction::Signal(Signal::Buy).signal(), Some(Signal::Buy));
        assert_eq!(Extraction::NoSignal.signal(), None);
        assert_eq!(Extraction::Failed("bad".into()).signal(), None);
    }
}
