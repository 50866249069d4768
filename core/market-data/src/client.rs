//! FILENAME: core/market-data/src/client.rs
//! PURPOSE: HTTP access to the exchange's public market endpoints.

use log::debug;
use serde_json::Value;
use std::time::Duration;

use crate::error::FetchError;
use crate::types::{parse_klines, BookTicker, RawKline};

pub const DEFAULT_BASE_URL: &str = "https://api.binance.us/api/v3";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where klines and book tickers come from.
pub trait KlineSource {
    fn fetch_klines(&self, symbol: &str, interval: &str, limit: u32) -> Result<Vec<RawKline>, FetchError>;

    fn fetch_book_ticker(&self, symbol: &str) -> Result<BookTicker, FetchError>;
}

/// Blocking client for the Binance REST API (v3 paths).
#[derive(Debug, Clone)]
pub struct BinanceClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl BinanceClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::http(base_url, e))?;

        Ok(BinanceClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn with_defaults() -> Result<Self, FetchError> {
        Self::new(DEFAULT_BASE_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn klines_url(&self, symbol: &str, interval: &str, limit: u32) -> String {
        format!(
            "{}/klines?symbol={}&interval={}&limit={}",
            self.base_url, symbol, interval, limit
        )
    }

    pub fn book_ticker_url(&self, symbol: &str) -> String {
        format!("{}/ticker/bookTicker?symbol={}", self.base_url, symbol)
    }

    fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        debug!(target: "market", "GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::http(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(|e| FetchError::http(url, e))?;
        decode_body(url, &body)
    }
}

/// A 2xx body that is not JSON is a malformed payload, not a transport error.
fn decode_body(url: &str, body: &str) -> Result<Value, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::malformed(format!("{} is not JSON: {}", url, e)))
}

impl KlineSource for BinanceClient {
    fn fetch_klines(&self, symbol: &str, interval: &str, limit: u32) -> Result<Vec<RawKline>, FetchError> {
        let payload = self.get_json(&self.klines_url(symbol, interval, limit))?;
        parse_klines(&payload)
    }

    fn fetch_book_ticker(&self, symbol: &str) -> Result<BookTicker, FetchError> {
        let payload = self.get_json(&self.book_ticker_url(symbol))?;
        BookTicker::from_value(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_endpoint_urls() {
        let client = BinanceClient::new("http://localhost:9000/api/v3/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9000/api/v3");
        assert_eq!(
            client.klines_url("SOLUSDT", "1d", 365),
            "http://localhost:9000/api/v3/klines?symbol=SOLUSDT&interval=1d&limit=365"
        );
        assert_eq!(
            client.book_ticker_url("BTCUSD"),
            "http://localhost:9000/api/v3/ticker/bookTicker?symbol=BTCUSD"
        );
    }

    #[test]
    fn non_json_body_is_malformed() {
        let err = decode_body("http://x/klines", "<html>busy</html>").unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));

        let value = decode_body("http://x/klines", "[[1,2]]").unwrap();
        assert!(value.is_array());
    }

    #[test]
    fn default_client_points_at_binance_us() {
        let client = BinanceClient::with_defaults().unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }
}
