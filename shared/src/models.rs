use serde::{Deserialize, Serialize};

/// One candle row exactly as returned by the exchange:
/// `[time, low, high, open, close, volume]`
pub type RawCandle = Vec<serde_json::Value>;

/// Outcome of a candles request that reached the exchange
#[derive(Debug, Clone, PartialEq)]
pub enum CandlesResponse {
    /// Rows for the requested window, newest first
    Candles(Vec<RawCandle>),
    /// The exchange refused the request because of its rate limiter
    RateLimited { message: String },
    /// Any other error payload
    Rejected { status: u16, message: String },
}

/// Error payload returned by the exchange, e.g. `{ "message": "NotFound" }`
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeErrorBody {
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandleFields {
    pub low: f64,
    pub high: f64,
    pub open: f64,
    pub close: f64,
    pub volume: f64,
}

/// A candle reshaped for the time-series database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoragePoint {
    pub measurement: String,
    /// Unix seconds
    pub time: i64,
    pub fields: CandleFields,
}

impl StoragePoint {
    /// Render the point in InfluxDB line protocol, timestamp in seconds.
    pub fn to_line_protocol(&self) -> String {
        let f = &self.fields;
        format!(
            "{} low={},high={},open={},close={},volume={} {}",
            escape_measurement(&self.measurement),
            f.low,
            f.high,
            f.open,
            f.close,
            f.volume,
            self.time
        )
    }
}

fn escape_measurement(name: &str) -> String {
    name.replace(',', "\\,").replace(' ', "\\ ")
}

/// Timestamp unit sent with a write. Only whole seconds are supported,
/// matching [`StoragePoint::time`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimePrecision {
    #[default]
    Seconds,
}

impl TimePrecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimePrecision::Seconds => "s",
        }
    }
}
