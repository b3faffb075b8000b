//! Parameters of one download run

use crate::config::SUPPORTED_GRANULARITIES;
use crate::error::DownloadError;
use crate::Result;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PRODUCT: &str = "BTC-USD";

/// One-minute candles
pub const DEFAULT_GRANULARITY: u32 = 60;

/// 2018-08-10T16:00:00Z
const DEFAULT_START_TIMESTAMP: i64 = 1_533_916_800;

pub fn default_start_time() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + TimeDelta::seconds(DEFAULT_START_TIMESTAMP)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadJob {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Exchange symbol, also used as the measurement name
    pub product: String,
    /// Seconds per candle
    pub granularity: u32,
}

impl DownloadJob {
    pub fn new(
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        product: impl Into<String>,
        granularity: u32,
    ) -> Self {
        Self {
            start_time,
            end_time,
            product: product.into(),
            granularity,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.start_time >= self.end_time {
            return Err(DownloadError::InvalidJob(format!(
                "start {} must be before end {}",
                self.start_time, self.end_time
            )));
        }
        if self.product.trim().is_empty() {
            return Err(DownloadError::InvalidJob("product must not be empty".to_string()));
        }
        // product ids look like BTC-USD; anything else would change the request path
        if !self
            .product
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(DownloadError::InvalidJob(format!(
                "product {:?} must contain only letters, digits and '-'",
                self.product
            )));
        }
        if !SUPPORTED_GRANULARITIES.contains(&self.granularity) {
            return Err(DownloadError::InvalidJob(format!(
                "granularity {} not one of {:?}",
                self.granularity, SUPPORTED_GRANULARITIES
            )));
        }
        Ok(())
    }
}

impl Default for DownloadJob {
    fn default() -> Self {
        Self::new(
            default_start_time(),
            Utc::now(),
            DEFAULT_PRODUCT,
            DEFAULT_GRANULARITY,
        )
    }
}
