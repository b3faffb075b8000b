//! Rates-RS: Coinbase historic rates into InfluxDB
//!
//! Downloads OHLCV candles for a product over an arbitrary date range and
//! writes them to a time-series database:
//!
//! - **Windows**: the range is sliced into request windows sized to the
//!   exchange page cap (300 rows)
//! - **Mapping**: each raw `[time, low, high, open, close, volume]` row
//!   becomes one storage point
//! - **Downloader**: bounded per-window retry, an adaptive courtesy delay
//!   driven by the exchange rate limiter, and a database readiness check
//!
//! # Example
//!
//! ```no_run
//! use rates_rs::prelude::*;
//! use shared::{CoinbaseClient, InfluxClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let source = CoinbaseClient::new("https://api.exchange.coinbase.com".to_string(), 30)?;
//!     let store = InfluxClient::new("http://localhost:8086".to_string(), None, None, 30)?;
//!     let downloader = Downloader::new(source, store);
//!     let report = downloader.download_historic_rates(&DownloadJob::default()).await?;
//!     println!("{} points written", report.points_written);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod data;
pub mod downloader;
pub mod error;
pub mod exchange;
pub mod storage;

// Re-export commonly used types
pub mod prelude {
    pub use crate::config::*;
    pub use crate::data::*;
    pub use crate::downloader::*;
    pub use crate::error::DownloadError;
    pub use crate::exchange::*;
    pub use crate::storage::*;
}

/// Result type alias
pub type Result<T> = std::result::Result<T, error::DownloadError>;
