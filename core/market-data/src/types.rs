//! FILENAME: core/market-data/src/types.rs
//! PURPOSE: Wire types for the klines and book ticker endpoints.
//! CONTEXT: A kline arrives as a 12-element JSON array. Prices and volumes
//! are decimal strings, timestamps and the trade count are integers. The
//! strings are kept as-is here; numeric coercion happens during
//! normalization so a bad field only empties that one value.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FetchError;

/// Number of fields in a kline array.
pub const KLINE_FIELDS: usize = 12;

/// One candle as returned by the API, before normalization.
/// The trailing "ignore" field is not kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawKline {
    pub open_time: i64,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
    pub close_time: i64,
    pub quote_asset_volume: String,
    pub num_trades: i64,
    pub taker_buy_base: String,
    pub taker_buy_quote: String,
}

impl RawKline {
    /// Reads a kline from its JSON array form.
    pub fn from_value(value: &Value) -> Result<Self, FetchError> {
        let fields = value
            .as_array()
            .ok_or_else(|| FetchError::malformed("kline is not an array"))?;
        if fields.len() < KLINE_FIELDS - 1 {
            return Err(FetchError::malformed(format!(
                "kline has {} fields, expected {}",
                fields.len(),
                KLINE_FIELDS
            )));
        }

        Ok(RawKline {
            open_time: integer(&fields[0], "open_time")?,
            open: decimal(&fields[1]),
            high: decimal(&fields[2]),
            low: decimal(&fields[3]),
            close: decimal(&fields[4]),
            volume: decimal(&fields[5]),
            close_time: integer(&fields[6], "close_time")?,
            quote_asset_volume: decimal(&fields[7]),
            num_trades: integer(&fields[8], "num_trades")?,
            taker_buy_base: decimal(&fields[9]),
            taker_buy_quote: decimal(&fields[10]),
        })
    }
}

/// Parses a klines response body.
pub fn parse_klines(payload: &Value) -> Result<Vec<RawKline>, FetchError> {
    payload
        .as_array()
        .ok_or_else(|| FetchError::malformed("klines response is not an array"))?
        .iter()
        .map(RawKline::from_value)
        .collect()
}

/// Best bid/ask snapshot for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookTicker {
    pub symbol: String,
    pub bid_price: String,
    #[serde(default)]
    pub bid_qty: String,
    pub ask_price: String,
    #[serde(default)]
    pub ask_qty: String,
}

impl BookTicker {
    pub fn from_value(value: Value) -> Result<Self, FetchError> {
        if !value.is_object() {
            return Err(FetchError::malformed("book ticker is not an object"));
        }
        serde_json::from_value(value).map_err(|e| FetchError::malformed(e.to_string()))
    }
}

/// Text of a numeric field. Strings pass through, numbers are printed,
/// anything else becomes the empty string (normalized to `Empty` later).
fn decimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn integer(value: &Value, field: &str) -> Result<i64, FetchError> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| FetchError::malformed(format!("{} is not an integer", field)))
}
