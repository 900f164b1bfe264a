//! Signal delivery port.

use async_trait::async_trait;

use crate::domain::Signal;
use crate::error::Result;

/// HTTP status and body returned by the receiving endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryResponse {
    pub status: u16,
    pub body: String,
}

impl DeliveryResponse {
    /// Only a plain 200 counts as accepted.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        self.status == 200
    }
}

/// Posts signals to the trading bot.
///
/// An `Err` means the request never got a response (connect failure,
/// timeout); a non-200 response is returned as `Ok`.
#[async_trait]
pub trait SignalDelivery: Send + Sync {
    async fn deliver(&self, signal: Signal) -> Result<DeliveryResponse>;

    /// Destination, for display.
    fn target(&self) -> &str;
}
