//! FILENAME: core/persistence/src/xlsx_writer.rs

use crate::{check_widths, PersistenceError};
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use engine::{CellValue, Record};
use log::info;
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, Worksheet};
use std::path::Path;

const SHEET_NAME: &str = "View";
const DATE_NUM_FORMAT: &str = "yyyy-mm-dd";
const DATETIME_NUM_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Widest column Excel gets from the auto-width pass, in characters.
const MAX_COLUMN_WIDTH: usize = 40;

/// Writes a single worksheet: bold header row, then the records.
/// Numbers stay numeric, dates get a date number format, text is text.
pub fn save_xlsx(columns: &[String], records: &[Record], path: &Path) -> Result<(), PersistenceError> {
    check_widths(columns, records)?;

    let mut xlsx = XlsxWorkbook::new();
    let worksheet = xlsx.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let header = Format::new().set_bold();
    let date_format = Format::new().set_num_format(DATE_NUM_FORMAT);
    let datetime_format = Format::new().set_num_format(DATETIME_NUM_FORMAT);

    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();

    for (col, name) in columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, name, &header)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        for (col, value) in record.values.iter().enumerate() {
            write_value(worksheet, row, col as u16, value, &date_format, &datetime_format)?;
            let width = &mut widths[col];
            *width = (*width).max(value.display_value().chars().count());
        }
    }

    // Excel uses character widths; pad slightly so values are not clipped.
    for (col, width) in widths.iter().enumerate() {
        let excel_width = ((*width).min(MAX_COLUMN_WIDTH) + 2) as f64;
        worksheet.set_column_width(col as u16, excel_width)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    xlsx.save(path)?;
    info!(target: "export", "wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

fn write_value(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
    date_format: &Format,
    datetime_format: &Format,
) -> Result<(), PersistenceError> {
    match value {
        CellValue::Empty => {}
        CellValue::Number(n) => {
            worksheet.write_number(row, col, *n)?;
        }
        CellValue::Text(s) => {
            worksheet.write_string(row, col, s)?;
        }
        CellValue::Date(d) => {
            worksheet.write_number_with_format(row, col, excel_date(*d), date_format)?;
        }
        CellValue::DateTime(dt) => {
            worksheet.write_number_with_format(row, col, excel_datetime(*dt), datetime_format)?;
        }
    }
    Ok(())
}

/// Excel serial day number (1900 date system).
fn excel_date(date: NaiveDate) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or_default();
    (date - epoch).num_days() as f64
}

fn excel_datetime(dt: NaiveDateTime) -> f64 {
    let seconds = dt.time().num_seconds_from_midnight();
    excel_date(dt.date()) + seconds as f64 / 86_400.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excel_serials() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(excel_date(d), 45292.0);
        let dt = d.and_hms_opt(12, 0, 0).unwrap();
        assert_eq!(excel_datetime(dt), 45292.5);
    }

    #[test]
    fn writes_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("view.xlsx");
        let columns = vec!["symbol".to_string(), "date".to_string(), "close".to_string()];
        let records = vec![
            Record::new(vec![
                CellValue::text("SOL"),
                CellValue::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
                CellValue::Number(100.0),
            ]),
            Record::new(vec![CellValue::text("BTC"), CellValue::Empty, CellValue::Empty]),
        ];

        save_xlsx(&columns, &records, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.len() > 100);
        assert_eq!(&bytes[0..2], b"PK");
    }

    #[test]
    fn rejects_ragged_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.xlsx");
        let records = vec![Record::new(vec![])];
        assert!(save_xlsx(&["a".to_string()], &records, &path).is_err());
        assert!(!path.exists());
    }
}
