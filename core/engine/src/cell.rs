//! FILENAME: core/engine/src/cell.rs
//! PURPOSE: Defines the value stored in a single dataset cell.
//! CONTEXT: Every record is a vector of `CellValue`s aligned with the dataset's
//! column list. `Empty` doubles as the null/missing marker produced when a raw
//! field cannot be coerced to its expected type.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Date format used for display, filtering and export.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Datetime format used for display, filtering and export.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Represents the raw data within a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    /// Builds a number cell, mapping NaN to `Empty`.
    pub fn number(n: f64) -> Self {
        if n.is_nan() {
            CellValue::Empty
        } else {
            CellValue::Number(n)
        }
    }

    /// Coerces a raw string to a number. Unparseable input becomes `Empty`.
    pub fn parse_number(raw: &str) -> Self {
        parse_f64(raw).map(CellValue::Number).unwrap_or(CellValue::Empty)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Numeric view of the value. Text is parsed, dates are not numbers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if !n.is_nan() => Some(*n),
            CellValue::Text(s) => parse_f64(s),
            _ => None,
        }
    }

    /// Chronological view of the value (dates become midnight).
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::Date(d) => d.and_hms_opt(0, 0, 0),
            CellValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Returns the display value of the cell as a String.
    /// This is the text used by filters, unique-value lists and CSV export.
    pub fn display_value(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => {
                // Format without unnecessary decimal places
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{:.0}", n)
                } else {
                    format!("{}", n)
                }
            }
            CellValue::Text(s) => s.clone(),
            CellValue::Date(d) => d.format(DATE_FORMAT).to_string(),
            CellValue::DateTime(dt) => dt.format(DATETIME_FORMAT).to_string(),
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Empty
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        CellValue::Date(d)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::DateTime(dt)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

/// Parses numeric text. "NaN" is rejected; infinities are kept.
pub(crate) fn parse_f64(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| !n.is_nan())
}

/// Total order over values of mixed type: numbers, then dates, then text.
/// Empty sorts before everything.
pub fn compare_values(a: &CellValue, b: &CellValue) -> Ordering {
    match (a, b) {
        (CellValue::Empty, CellValue::Empty) => Ordering::Equal,
        (CellValue::Empty, _) => Ordering::Less,
        (_, CellValue::Empty) => Ordering::Greater,

        (CellValue::Number(na), CellValue::Number(nb)) => {
            na.total_cmp(nb)
        }
        (CellValue::Number(_), _) => Ordering::Less,
        (_, CellValue::Number(_)) => Ordering::Greater,

        (CellValue::Text(ta), CellValue::Text(tb)) => ta.cmp(tb),
        (CellValue::Text(_), _) => Ordering::Greater,
        (_, CellValue::Text(_)) => Ordering::Less,

        (x, y) => x.as_datetime().cmp(&y.as_datetime()),
    }
}
