//! FILENAME: core/pivot-engine/src/lib.rs
//! Pivot subsystem for CandleView.
//!
//! This crate groups a record sequence by one or more key columns and sums
//! the aggregate columns within each group. It depends on `engine` only for
//! shared types (CellValue, Record, Dataset).
//!
//! Layers:
//! - `definition`: What the pivot IS (group-by and aggregate columns)
//! - `cache`: Interned representation used while grouping
//! - `engine`: The calculation that produces the pivoted Dataset

pub mod definition;
pub mod cache;
pub mod engine;

pub use definition::*;
pub use cache::*;
pub use self::engine::calculate_pivot;
