//! FILENAME: core/view-engine/src/state.rs
//! PURPOSE: The view state and its transitions.
//! CONTEXT: `ViewState` is a plain value. Each user action is a `ViewAction`,
//! and `ViewState::apply` is a pure function of (data, previous state,
//! action) that either returns the next state or a `ViewError`, leaving the
//! previous state untouched. The displayed rows are derived from the state by
//! `ViewState::displayed_rows`.

use engine::{ColumnKind, Dataset};
use pivot_engine::PivotDefinition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ViewError;
use crate::filter::FilterSpec;
use crate::sort::{sort_rows, SortDirection, SortSpec};

// ============================================================================
// VIEW DATA
// ============================================================================

/// The datasets a view can be computed over.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewData {
    /// The dataset loaded at startup. Never modified.
    pub original: Dataset,
    /// The grouped dataset while a pivot is active.
    pub pivoted: Option<Dataset>,
}

impl ViewData {
    pub fn new(original: Dataset) -> Self {
        ViewData {
            original,
            pivoted: None,
        }
    }

    /// The dataset the current view is built from.
    pub fn base(&self) -> &Dataset {
        self.pivoted.as_ref().unwrap_or(&self.original)
    }
}

// ============================================================================
// ACTIONS
// ============================================================================

/// A user-triggered change to the view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewAction {
    ApplyFilter(FilterSpec),
    ClearFilter,
    Sort(String),
    MoveColumn { column: String, position: usize },
    Pivot(PivotDefinition),
    Unpivot,
}

// ============================================================================
// VIEW STATE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub filter: Option<FilterSpec>,
    pub sort: Option<SortSpec>,
    /// Last direction used per column, so each column toggles independently.
    pub sort_directions: BTreeMap<String, SortDirection>,
    /// Displayed column order. Always a permutation of the base columns.
    pub column_order: Vec<String>,
    pub pivot: Option<PivotDefinition>,
}

impl ViewState {
    /// The state right after loading `dataset`.
    pub fn initial(dataset: &Dataset) -> Self {
        ViewState {
            filter: None,
            sort: None,
            sort_directions: BTreeMap::new(),
            column_order: dataset.columns().to_vec(),
            pivot: None,
        }
    }

    pub fn is_pivoted(&self) -> bool {
        self.pivot.is_some()
    }

    /// Computes the state that follows `action`.
    pub fn apply(&self, data: &ViewData, action: &ViewAction) -> Result<ViewState, ViewError> {
        let base = data.base();
        match action {
            ViewAction::ApplyFilter(spec) => {
                spec.validate(base)?;
                Ok(ViewState {
                    filter: Some(spec.clone()),
                    ..self.clone()
                })
            }
            ViewAction::ClearFilter => Ok(ViewState {
                filter: None,
                ..self.clone()
            }),
            ViewAction::Sort(column) => {
                if !base.has_column(column) {
                    return Err(ViewError::unknown_column(column));
                }
                let direction = SortDirection::toggle(self.sort_directions.get(column).copied());
                let mut next = self.clone();
                next.sort_directions.insert(column.clone(), direction);
                next.sort = Some(SortSpec {
                    column: column.clone(),
                    direction,
                });
                Ok(next)
            }
            ViewAction::MoveColumn { column, position } => {
                let column_order = move_column(&self.column_order, column, *position)?;
                Ok(ViewState {
                    column_order,
                    ..self.clone()
                })
            }
            ViewAction::Pivot(definition) => {
                definition.resolve(base.columns())?;
                Ok(ViewState {
                    filter: None,
                    sort: None,
                    sort_directions: BTreeMap::new(),
                    column_order: definition.output_columns(),
                    pivot: Some(definition.clone()),
                })
            }
            ViewAction::Unpivot => Ok(ViewState::initial(&data.original)),
        }
    }

    /// Indices into `base` of the rows to display, in display order.
    /// `kinds` holds the inferred kind of each base column.
    pub fn displayed_rows(&self, base: &Dataset, kinds: &[ColumnKind]) -> Vec<usize> {
        let mut rows: Vec<usize> = match &self.filter {
            Some(spec) => match base.column_index(&spec.column) {
                Some(col) => base
                    .records()
                    .iter()
                    .enumerate()
                    .filter(|(_, r)| spec.matches(r.get(col)))
                    .map(|(i, _)| i)
                    .collect(),
                None => Vec::new(),
            },
            None => (0..base.len()).collect(),
        };

        if let Some(sort) = &self.sort {
            if let Some(col) = base.column_index(&sort.column) {
                let kind = kinds.get(col).copied().unwrap_or(ColumnKind::Text);
                sort_rows(base, &mut rows, col, kind, sort.direction);
            }
        }
        rows
    }
}

/// Relocates `column` to the 1-based `position`. Either the whole move
/// happens or an error is returned.
pub fn move_column(order: &[String], column: &str, position: usize) -> Result<Vec<String>, ViewError> {
    let invalid = || ViewError::InvalidPosition {
        column: column.to_string(),
        position,
        column_count: order.len(),
    };
    if position < 1 || position > order.len() {
        return Err(invalid());
    }
    let current = order.iter().position(|c| c == column).ok_or_else(invalid)?;

    let mut next = order.to_vec();
    let moved = next.remove(current);
    next.insert(position - 1, moved);
    Ok(next)
}
