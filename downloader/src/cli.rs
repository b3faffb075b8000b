use chrono::{DateTime, NaiveDate, Utc};
use clap::Parser;
use rates_rs::downloader::{DownloadJob, DEFAULT_GRANULARITY, DEFAULT_PRODUCT};
use std::path::PathBuf;

/// Download Coinbase historic rates into InfluxDB
#[derive(Debug, Parser)]
#[command(name = "downloader", version)]
pub struct Args {
    /// First candle to download (RFC 3339 or YYYY-MM-DD)
    #[arg(long, value_parser = parse_timestamp, default_value = "2018-08-10T16:00:00Z")]
    pub start: DateTime<Utc>,

    /// Stop before this time (defaults to now)
    #[arg(long, value_parser = parse_timestamp)]
    pub end: Option<DateTime<Utc>>,

    /// Exchange product, e.g. BTC-USD
    #[arg(long, default_value = DEFAULT_PRODUCT)]
    pub product: String,

    /// Seconds per candle
    #[arg(long, default_value_t = DEFAULT_GRANULARITY)]
    pub granularity: u32,

    /// Echo progress and errors to the console
    #[arg(short, long)]
    pub verbose: bool,

    /// Structured (JSON) log destination
    #[arg(long, default_value = "historic_rates.log")]
    pub log_file: PathBuf,
}

impl Args {
    pub fn into_job(self) -> DownloadJob {
        DownloadJob::new(
            self.start,
            self.end.unwrap_or_else(Utc::now),
            self.product,
            self.granularity,
        )
    }
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("invalid timestamp '{}', expected RFC 3339 or YYYY-MM-DD", value))
}
