//! FILENAME: core/view-engine/src/error.rs

use engine::DatasetError;
use pivot_engine::PivotError;
use thiserror::Error;

/// User-input validation failures. The engine state is left unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewError {
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    #[error("invalid position {position} for column '{column}' (expected 1..={column_count})")]
    InvalidPosition {
        column: String,
        position: usize,
        column_count: usize,
    },

    #[error("unknown columns: {}", .missing.join(", "))]
    InvalidColumns { missing: Vec<String> },

    #[error("select at least one group-by column and one sum column")]
    EmptyPivot,

    #[error("column used more than once: {0}")]
    DuplicateColumn(String),

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

impl ViewError {
    pub fn unknown_column(name: &str) -> Self {
        ViewError::InvalidColumns {
            missing: vec![name.to_string()],
        }
    }
}

impl From<PivotError> for ViewError {
    fn from(err: PivotError) -> Self {
        match err {
            PivotError::MissingColumns(missing) => ViewError::InvalidColumns { missing },
            PivotError::EmptySelection => ViewError::EmptyPivot,
            PivotError::DuplicateColumn(name) => ViewError::DuplicateColumn(name),
            PivotError::Dataset(e) => ViewError::Dataset(e),
        }
    }
}
