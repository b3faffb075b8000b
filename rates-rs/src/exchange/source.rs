//! Candle source backed by the Coinbase REST client

use crate::error::DownloadError;
use crate::Result;
use chrono::{DateTime, Utc};
use shared::{CandlesResponse, CoinbaseClient};
use std::future::Future;

/// Anything that can hand out candle rows for a product and time window
pub trait CandleSource {
    /// One request for `[start, end)`. Transport failures are `Err`; error
    /// payloads from the exchange come back inside [`CandlesResponse`].
    fn fetch_candles(
        &self,
        product: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        granularity: u32,
    ) -> impl Future<Output = Result<CandlesResponse>> + Send;
}

impl CandleSource for CoinbaseClient {
    async fn fetch_candles(
        &self,
        product: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        granularity: u32,
    ) -> Result<CandlesResponse> {
        self.get_product_historic_rates(product, start, end, granularity)
            .await
            .map_err(DownloadError::fetch)
    }
}
