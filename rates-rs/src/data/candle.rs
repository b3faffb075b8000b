//! Raw exchange candle → storage point

use crate::error::DownloadError;
use crate::Result;
use serde_json::Value;
use shared::{CandleFields, RawCandle, StoragePoint};

const FIELD_NAMES: [&str; 6] = ["time", "low", "high", "open", "close", "volume"];

/// Map one `[time, low, high, open, close, volume]` row onto the storage
/// schema. The product becomes the measurement name.
pub fn map_record(product: &str, raw: &RawCandle) -> Result<StoragePoint> {
    if raw.len() < FIELD_NAMES.len() {
        return Err(DownloadError::MalformedRecord(format!(
            "expected {} elements, got {}: {:?}",
            FIELD_NAMES.len(),
            raw.len(),
            raw
        )));
    }

    let time = match raw[0].as_i64() {
        Some(seconds) => seconds,
        None => number(raw, 0)?.trunc() as i64,
    };

    Ok(StoragePoint {
        measurement: product.to_string(),
        time,
        fields: CandleFields {
            low: number(raw, 1)?,
            high: number(raw, 2)?,
            open: number(raw, 3)?,
            close: number(raw, 4)?,
            volume: number(raw, 5)?,
        },
    })
}

/// Map a whole window; the first bad row fails the batch
pub fn map_records(product: &str, rows: &[RawCandle]) -> Result<Vec<StoragePoint>> {
    rows.iter().map(|raw| map_record(product, raw)).collect()
}

fn number(raw: &RawCandle, index: usize) -> Result<f64> {
    let value = &raw[index];
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(DownloadError::MalformedRecord(format!(
            "{} is not numeric: {}",
            FIELD_NAMES[index], value
        ))),
    }
}
