//! FILENAME: tests/common/mod.rs
//! Test harness and fixtures for view-engine integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use engine::{CellValue, Dataset};
use view_engine::ViewEngine;

/// Small candle dataset: `[symbol, date, close, volume]`.
pub struct CandleFixture;

impl CandleFixture {
    pub fn headers() -> Vec<String> {
        ["symbol", "date", "close", "volume"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn data() -> Vec<(&'static str, (i32, u32, u32), f64, f64)> {
        vec![
            ("SOL", (2024, 1, 1), 100.0, 10.0),
            ("SOL", (2024, 1, 2), 110.0, 20.0),
            ("BTC", (2024, 1, 1), 40000.0, 5.0),
        ]
    }

    pub fn dataset() -> Dataset {
        let rows = Self::data()
            .into_iter()
            .map(|(symbol, (y, m, d), close, volume)| {
                vec![
                    CellValue::text(symbol),
                    NaiveDate::from_ymd_opt(y, m, d)
                        .map(CellValue::Date)
                        .unwrap_or_default(),
                    CellValue::Number(close),
                    CellValue::Number(volume),
                ]
            })
            .collect();
        Dataset::from_rows(Self::headers(), rows).unwrap()
    }
}

/// Wider dataset with ties, gaps and several symbols.
pub struct MarketFixture;

impl MarketFixture {
    pub fn dataset() -> Dataset {
        let rows = vec![
            ("SOLUSDT", "2024-01-01", Some(100.0), Some(10.0)),
            ("BTCUSD", "2024-01-01", Some(40000.0), Some(5.0)),
            ("SOLUSDT", "2024-01-02", Some(110.0), Some(20.0)),
            ("ETCUSD", "2024-01-01", None, Some(7.0)),
            ("BTCUSD", "2024-01-02", Some(41000.0), Some(5.0)),
            ("JUPUSD", "2024-01-01", Some(0.5), None),
            ("ETCUSD", "2024-01-02", Some(25.0), Some(7.0)),
        ];
        let rows = rows
            .into_iter()
            .map(|(symbol, date, close, volume)| {
                vec![
                    CellValue::text(symbol),
                    CellValue::text(date),
                    close.map(CellValue::Number).unwrap_or_default(),
                    volume.map(CellValue::Number).unwrap_or_default(),
                ]
            })
            .collect();
        Dataset::from_rows(CandleFixture::headers(), rows).unwrap()
    }
}

pub fn candle_engine() -> ViewEngine {
    ViewEngine::new(CandleFixture::dataset())
}

pub fn market_engine() -> ViewEngine {
    ViewEngine::new(MarketFixture::dataset())
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Display text of one column over the displayed rows.
pub fn displayed_column(engine: &ViewEngine, column: &str) -> Vec<String> {
    let col = engine
        .column_order()
        .iter()
        .position(|c| c == column)
        .unwrap();
    (0..engine.displayed_len())
        .map(|i| engine.displayed_row(i).unwrap()[col].display_value())
        .collect()
}

/// Display text of every displayed row.
pub fn displayed_table(engine: &ViewEngine) -> Vec<Vec<String>> {
    (0..engine.displayed_len())
        .map(|i| {
            engine
                .displayed_row(i)
                .unwrap()
                .into_iter()
                .map(|v| v.display_value())
                .collect()
        })
        .collect()
}
