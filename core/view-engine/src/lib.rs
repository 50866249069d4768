//! FILENAME: core/view-engine/src/lib.rs
//! View-State Engine for CandleView.
//!
//! Turns the loaded Dataset into the currently displayed view:
//! filter -> sort -> pivot/unpivot -> column order.
//!
//! Layers:
//! - `filter` / `sort`: the per-action building blocks
//! - `state`: `ViewState`, a plain value with pure transitions
//! - `engine`: `ViewEngine`, which owns the data and materializes the view
//! - `chart`: x/y series extraction from the displayed rows

pub mod chart;
pub mod engine;
pub mod error;
pub mod filter;
pub mod sort;
pub mod state;

pub use chart::{ChartPoint, ChartSeries};
pub use self::engine::ViewEngine;
pub use error::ViewError;
pub use filter::{FilterCriterion, FilterSpec};
pub use sort::{SortDirection, SortSpec};
pub use state::{ViewAction, ViewData, ViewState};
