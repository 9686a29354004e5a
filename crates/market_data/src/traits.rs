use async_trait::async_trait;
use common::models::{OrderIntent, PriceSeries};

use crate::error::BrokerError;

/// Conversion from a raw brokerage payload into a domain model.
pub trait RemoteResponse<T> {
    fn to_model(&self) -> Result<T, BrokerError>;
}

/// The external brokerage capabilities the bot relies on.
///
/// Every call is a single request/response; implementations do not retry.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait Brokerage: Send + Sync {
    /// Historical closing prices, oldest first.
    async fn fetch_bars(
        &self,
        symbol: &str,
        interval: &str,
        count: usize,
    ) -> Result<PriceSeries, BrokerError>;

    /// Cash currently available for purchases.
    async fn fetch_available_funds(&self) -> Result<f64, BrokerError>;

    /// Tickers of the strongest gainers, best first.
    async fn fetch_top_movers(&self, limit: usize) -> Result<Vec<String>, BrokerError>;

    async fn submit_order(&self, order: &OrderIntent) -> Result<(), BrokerError>;
}
