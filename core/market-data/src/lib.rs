//! FILENAME: core/market-data/src/lib.rs
//! Market data supplier for CandleView.
//!
//! Fetches klines and best bid/ask snapshots per symbol and flattens them into
//! a single `engine::Dataset`. The HTTP side sits behind the `KlineSource`
//! trait; `BinanceClient` is the blocking implementation.

pub mod client;
pub mod error;
pub mod supplier;
pub mod types;

pub use client::{BinanceClient, KlineSource, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use error::FetchError;
pub use supplier::{kline_columns, load_dataset, normalize_kline, BatchReport, KLINE_COLUMNS};
pub use types::{parse_klines, BookTicker, RawKline};
