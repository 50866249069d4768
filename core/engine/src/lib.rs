//! FILENAME: core/engine/src/lib.rs
//! PURPOSE: Main library entry point for the dataset model.
//! CONTEXT: Re-exports public types and modules for use by other crates.

pub mod cell;
pub mod column_kind;
pub mod dataset;

// Re-export commonly used types at the crate root
pub use cell::{compare_values, CellValue, DATETIME_FORMAT, DATE_FORMAT};
pub use column_kind::{infer_column_kinds, ColumnKind};
pub use dataset::{Dataset, DatasetError, Record};
