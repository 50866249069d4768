//! FILENAME: core/engine/src/dataset.rs
//! PURPOSE: Manages the collection of records (The Dataset).
//! CONTEXT: A dataset is an ordered list of column names plus an ordered list
//! of records. Each record stores its values positionally, aligned with the
//! column list, so the "every record has exactly the dataset's columns"
//! invariant reduces to a width check on insert.

use crate::cell::CellValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DatasetError {
    #[error("record has {actual} values but the dataset has {expected} columns")]
    WidthMismatch { expected: usize, actual: usize },

    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),
}

/// A single row. Values are indexed by the owning dataset's column positions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    pub values: Vec<CellValue>,
}

impl Record {
    pub fn new(values: Vec<CellValue>) -> Self {
        Record { values }
    }

    pub fn get(&self, index: usize) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.values.get(index).unwrap_or(&EMPTY)
    }
}

/// The Dataset struct holds the loaded table.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<Record>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl PartialEq for Dataset {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns && self.records == other.records
    }
}

impl Dataset {
    /// Creates an empty dataset with the given columns.
    pub fn new(columns: Vec<String>) -> Result<Self, DatasetError> {
        let mut index = HashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(DatasetError::DuplicateColumn(name.clone()));
            }
        }
        Ok(Dataset {
            columns,
            records: Vec::new(),
            index,
        })
    }

    /// Builds a dataset from columns and rows, validating every row width.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Result<Self, DatasetError> {
        let mut dataset = Dataset::new(columns)?;
        dataset.records.reserve(rows.len());
        for row in rows {
            dataset.push_record(Record::new(row))?;
        }
        Ok(dataset)
    }

    /// Appends a record. Rejects records whose width differs from the column count.
    pub fn push_record(&mut self, record: Record) -> Result<(), DatasetError> {
        if record.values.len() != self.columns.len() {
            return Err(DatasetError::WidthMismatch {
                expected: self.columns.len(),
                actual: record.values.len(),
            });
        }
        self.records.push(record);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Returns the value of `column` in the record at `row`.
    pub fn value(&self, row: usize, column: &str) -> Option<&CellValue> {
        let col = self.column_index(column)?;
        self.records.get(row).map(|r| r.get(col))
    }

    /// Iterates one column's values in record order.
    pub fn column_values<'a>(&'a self, column: &str) -> Option<impl Iterator<Item = &'a CellValue> + 'a> {
        let col = self.column_index(column)?;
        Some(self.records.iter().map(move |r| r.get(col)))
    }
}
