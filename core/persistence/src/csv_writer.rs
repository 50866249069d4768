//! FILENAME: core/persistence/src/csv_writer.rs

use crate::{check_widths, PersistenceError};
use engine::Record;
use log::info;
use std::path::Path;

/// Writes a header line and one line per record, using each value's display
/// text. Empty values become empty fields.
pub fn save_csv(columns: &[String], records: &[Record], path: &Path) -> Result<(), PersistenceError> {
    check_widths(columns, records)?;

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(columns)?;
    for record in records {
        writer.write_record(record.values.iter().map(|v| v.display_value()))?;
    }
    writer.flush()?;

    info!(target: "export", "wrote {} rows to {}", records.len(), path.display());
    Ok(())
}
