//! FILENAME: core/persistence/src/lib.rs
//! CandleView Persistence Module
//!
//! Writes the displayed rows of a view to disk, either as delimited text or
//! as an XLSX workbook. Both writers are plain order-preserving dumps: a
//! header row with the column names, then one row per record.

mod csv_writer;
mod error;
mod xlsx_writer;

pub use csv_writer::save_csv;
pub use error::PersistenceError;
pub use xlsx_writer::save_xlsx;

use engine::Record;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

// ============================================================================
// EXPORT FORMAT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    /// Guesses the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl FromStr for ExportFormat {
    type Err = PersistenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" => Ok(ExportFormat::Xlsx),
            other => Err(PersistenceError::UnknownFormat(other.to_string())),
        }
    }
}

/// Writes `records` (laid out as `columns`) in the given format.
pub fn export(
    format: ExportFormat,
    columns: &[String],
    records: &[Record],
    path: &Path,
) -> Result<(), PersistenceError> {
    match format {
        ExportFormat::Csv => save_csv(columns, records, path),
        ExportFormat::Xlsx => save_xlsx(columns, records, path),
    }
}

/// Every record must be exactly as wide as the header.
pub(crate) fn check_widths(columns: &[String], records: &[Record]) -> Result<(), PersistenceError> {
    for (row, record) in records.iter().enumerate() {
        if record.values.len() != columns.len() {
            return Err(PersistenceError::RowWidth {
                row,
                expected: columns.len(),
                actual: record.values.len(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_format_names() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("xlsx".parse::<ExportFormat>().unwrap(), ExportFormat::Xlsx);
        assert!(matches!(
            "ods".parse::<ExportFormat>(),
            Err(PersistenceError::UnknownFormat(_))
        ));
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(ExportFormat::from_path(Path::new("out/view.xlsx")), Some(ExportFormat::Xlsx));
        assert_eq!(ExportFormat::from_path(Path::new("view.csv")), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::from_path(Path::new("view")), None);
    }
}
