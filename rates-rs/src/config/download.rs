//! Download loop configuration

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Destination database for every product
pub const DEFAULT_DATABASE: &str = "coinbase-historic-rates";

/// Candle sizes (seconds) the exchange accepts
pub const SUPPORTED_GRANULARITIES: [u32; 6] = [60, 300, 900, 3600, 21600, 86400];

/// Knobs of the retrieval-and-write loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Width of one request window in minutes (300 rows at 1m granularity)
    pub step_minutes: u32,
    /// Attempts per window before the job is aborted
    pub max_attempts: u32,
    /// Added to the courtesy delay on every rate-limit signal
    pub courtesy_increment: Duration,
    /// Pause right after a rate-limit signal
    pub rate_limit_pause: Duration,
    /// Database the points are written to
    pub database: String,
    /// How many times the database list is polled before giving up
    pub readiness_polls: u32,
    /// Pause between two database list polls
    pub readiness_interval: Duration,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            step_minutes: 300,
            max_attempts: 5,
            courtesy_increment: Duration::from_millis(250),
            rate_limit_pause: Duration::from_secs(1),
            database: DEFAULT_DATABASE.to_string(),
            readiness_polls: 10,
            readiness_interval: Duration::from_secs(1),
        }
    }
}

impl DownloadConfig {
    pub fn step(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.step_minutes))
    }
}
