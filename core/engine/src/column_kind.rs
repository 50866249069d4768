//! FILENAME: core/engine/src/column_kind.rs
//! PURPOSE: Per-column type inference.
//! CONTEXT: Sorting and aggregation need to know whether a column holds
//! numbers, dates or free text. The kind is inferred once per column from the
//! non-empty values and reused, instead of re-attempting coercion per call.

use crate::cell::{parse_f64, CellValue};
use crate::dataset::Dataset;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    Numeric,
    Text,
    Date,
}

impl ColumnKind {
    /// Infers the kind of a sequence of values.
    /// An all-empty (or zero-length) sequence is `Text`.
    pub fn infer<'a>(values: impl IntoIterator<Item = &'a CellValue>) -> ColumnKind {
        let mut saw_number = false;
        let mut saw_date = false;

        for value in values {
            match value {
                CellValue::Empty => {}
                CellValue::Number(n) if n.is_nan() => return ColumnKind::Text,
                CellValue::Number(_) => saw_number = true,
                CellValue::Date(_) | CellValue::DateTime(_) => saw_date = true,
                CellValue::Text(s) => {
                    if parse_f64(s).is_some() {
                        saw_number = true;
                    } else {
                        return ColumnKind::Text;
                    }
                }
            }
            if saw_number && saw_date {
                return ColumnKind::Text;
            }
        }

        if saw_number {
            ColumnKind::Numeric
        } else if saw_date {
            ColumnKind::Date
        } else {
            ColumnKind::Text
        }
    }
}

/// Infers the kind of every column of a dataset, in column order.
pub fn infer_column_kinds(dataset: &Dataset) -> Vec<ColumnKind> {
    (0..dataset.column_count())
        .map(|col| ColumnKind::infer(dataset.records().iter().map(|r| r.get(col))))
        .collect()
}
