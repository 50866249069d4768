//! FILENAME: core/market-data/src/supplier.rs
//! PURPOSE: Batch loading of several symbols into one Dataset.
//! CONTEXT: Symbols are fetched one after another. A symbol whose klines
//! cannot be fetched is skipped and reported; a missing book ticker only
//! empties that symbol's bid/ask. The batch itself never fails on fetch
//! errors, and when every symbol fails the result is an empty Dataset that
//! still carries the column header.

use chrono::DateTime;
use engine::{CellValue, Dataset, DatasetError, Record};
use log::{debug, info, warn};

use crate::client::KlineSource;
use crate::error::FetchError;
use crate::types::{BookTicker, RawKline};

/// Output columns, in order.
pub const KLINE_COLUMNS: [&str; 16] = [
    "symbol",
    "date",
    "open_time",
    "open",
    "high",
    "low",
    "close",
    "volume",
    "close_time",
    "quote_asset_volume",
    "num_trades",
    "taker_buy_base",
    "taker_buy_quote",
    "volatility",
    "bid",
    "ask",
];

pub fn kline_columns() -> Vec<String> {
    KLINE_COLUMNS.iter().map(|c| c.to_string()).collect()
}

// ============================================================================
// BATCH REPORT
// ============================================================================

/// Outcome of a batch load, per symbol.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<(String, FetchError)>,
    pub warnings: Vec<String>,
}

impl BatchReport {
    pub fn all_failed(&self) -> bool {
        self.succeeded.is_empty() && !self.failed.is_empty()
    }

    /// One-line summary, e.g. "3 loaded, 1 failed, 0 warnings".
    pub fn summary(&self) -> String {
        format!(
            "{} loaded, {} failed, {} warnings",
            self.succeeded.len(),
            self.failed.len(),
            self.warnings.len()
        )
    }
}

// ============================================================================
// LOADING
// ============================================================================

/// Fetches every symbol and concatenates the normalized candles in symbol
/// order. Fetch errors end up in the report; only an inconsistent record
/// width (which normalization never produces) is returned as an error.
pub fn load_dataset<S: KlineSource + ?Sized>(
    source: &S,
    symbols: &[String],
    interval: &str,
    limit: u32,
) -> Result<(Dataset, BatchReport), DatasetError> {
    let mut dataset = Dataset::new(kline_columns())?;
    let mut report = BatchReport::default();

    for symbol in symbols {
        let klines = match source.fetch_klines(symbol, interval, limit) {
            Ok(klines) => klines,
            Err(err) => {
                warn!(target: "market", "skipping {}: {}", symbol, err);
                report.failed.push((symbol.clone(), err));
                continue;
            }
        };

        let ticker = match source.fetch_book_ticker(symbol) {
            Ok(ticker) => Some(ticker),
            Err(err) => {
                warn!(target: "market", "no bid/ask for {}: {}", symbol, err);
                report.warnings.push(format!("{}: bid/ask unavailable ({})", symbol, err));
                None
            }
        };

        for kline in &klines {
            dataset.push_record(normalize_kline(symbol, kline, ticker.as_ref()))?;
        }
        info!(target: "market", "{}: {} candles ({})", symbol, klines.len(), interval);
        report.succeeded.push(symbol.clone());
    }

    info!(target: "market", "batch finished: {}", report.summary());
    Ok((dataset, report))
}

/// Converts one candle into a record laid out as `KLINE_COLUMNS`.
pub fn normalize_kline(symbol: &str, kline: &RawKline, ticker: Option<&BookTicker>) -> Record {
    let open_time = timestamp(kline.open_time);
    let date = match &open_time {
        CellValue::DateTime(dt) => CellValue::Date(dt.date()),
        _ => CellValue::Empty,
    };
    let high = number(symbol, "high", &kline.high);
    let low = number(symbol, "low", &kline.low);
    let volatility = match (high.as_f64(), low.as_f64()) {
        (Some(h), Some(l)) => CellValue::number(h - l),
        _ => CellValue::Empty,
    };
    let (bid, ask) = match ticker {
        Some(t) => (number(symbol, "bid", &t.bid_price), number(symbol, "ask", &t.ask_price)),
        None => (CellValue::Empty, CellValue::Empty),
    };

    Record::new(vec![
        CellValue::text(symbol),
        date,
        open_time,
        number(symbol, "open", &kline.open),
        high,
        low,
        number(symbol, "close", &kline.close),
        number(symbol, "volume", &kline.volume),
        timestamp(kline.close_time),
        number(symbol, "quote_asset_volume", &kline.quote_asset_volume),
        CellValue::Number(kline.num_trades as f64),
        number(symbol, "taker_buy_base", &kline.taker_buy_base),
        number(symbol, "taker_buy_quote", &kline.taker_buy_quote),
        volatility,
        bid,
        ask,
    ])
}

fn number(symbol: &str, field: &str, raw: &str) -> CellValue {
    let value = CellValue::parse_number(raw);
    if value.is_empty() {
        debug!(target: "market", "{}: {} '{}' is not a number", symbol, field, raw);
    }
    value
}

/// Milliseconds since the epoch (UTC) to a naive datetime.
fn timestamp(millis: i64) -> CellValue {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| CellValue::DateTime(dt.naive_utc()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn kline(high: &str, low: &str) -> RawKline {
        RawKline {
            open_time: 1704067200000,
            open: "100".into(),
            high: high.into(),
            low: low.into(),
            close: "104.5".into(),
            volume: "1000".into(),
            close_time: 1704153599999,
            quote_asset_volume: "104000".into(),
            num_trades: 42,
            taker_buy_base: "500".into(),
            taker_buy_quote: "52000".into(),
        }
    }

    #[test]
    fn normalizes_times_and_numbers() {
        let record = normalize_kline("SOLUSDT", &kline("110", "95"), None);
        assert_eq!(record.values.len(), KLINE_COLUMNS.len());
        assert_eq!(record.get(0), &CellValue::text("SOLUSDT"));
        assert_eq!(
            record.get(1),
            &CellValue::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        );
        assert_eq!(record.get(2).display_value(), "2024-01-01 00:00:00");
        assert_eq!(record.get(8).display_value(), "2024-01-01 23:59:59");
        assert_eq!(record.get(6), &CellValue::Number(104.5));
        assert_eq!(record.get(10), &CellValue::Number(42.0));
    }

    #[test]
    fn volatility_is_high_minus_low() {
        let record = normalize_kline("SOLUSDT", &kline("110", "95.5"), None);
        assert_eq!(record.get(13), &CellValue::Number(14.5));
    }

    #[test]
    fn volatility_empty_when_input_unparseable() {
        let record = normalize_kline("SOLUSDT", &kline("n/a", "95"), None);
        assert_eq!(record.get(4), &CellValue::Empty);
        assert_eq!(record.get(5), &CellValue::Number(95.0));
        assert_eq!(record.get(13), &CellValue::Empty);
    }

    #[test]
    fn bid_ask_from_ticker() {
        let ticker = BookTicker {
            symbol: "SOLUSDT".into(),
            bid_price: "101.1".into(),
            bid_qty: "1".into(),
            ask_price: "101.2".into(),
            ask_qty: "1".into(),
        };
        let record = normalize_kline("SOLUSDT", &kline("110", "95"), Some(&ticker));
        assert_eq!(record.get(14), &CellValue::Number(101.1));
        assert_eq!(record.get(15), &CellValue::Number(101.2));

        let record = normalize_kline("SOLUSDT", &kline("110", "95"), None);
        assert!(record.get(14).is_empty() && record.get(15).is_empty());
    }

    #[test]
    fn report_summary() {
        let report = BatchReport {
            succeeded: vec!["SOLUSDT".into()],
            failed: vec![("XYZ".into(), FetchError::Malformed("x".into()))],
            warnings: vec![],
        };
        assert_eq!(report.summary(), "1 loaded, 1 failed, 0 warnings");
        assert!(!report.all_failed());
    }
}
