//! FILENAME: core/market-data/src/error.rs

use thiserror::Error;

/// Failure to fetch one symbol's data. Recovered per symbol by the supplier.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Http { url: String, message: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("malformed payload: {0}")]
    Malformed(String),
}

impl FetchError {
    pub(crate) fn http(url: &str, err: reqwest::Error) -> Self {
        FetchError::Http {
            url: url.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn malformed(what: impl Into<String>) -> Self {
        FetchError::Malformed(what.into())
    }
}
