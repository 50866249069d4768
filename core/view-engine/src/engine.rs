//! FILENAME: core/view-engine/src/engine.rs
//! PURPOSE: Owns the loaded data and the current view.
//! CONTEXT: `ViewEngine` is the single owner of the dataset/view-state pair.
//! Every action goes through `dispatch`, which computes the next state first
//! and only commits it (and any pivoted dataset) once everything succeeded.

use engine::{infer_column_kinds, CellValue, ColumnKind, Dataset, Record};
use log::{debug, info};
use pivot_engine::calculate_pivot;
use std::cell::RefCell;
use std::collections::HashMap;

use crate::chart::ChartSeries;
use crate::error::ViewError;
use crate::filter::FilterSpec;
use crate::state::{ViewAction, ViewData, ViewState};
use pivot_engine::PivotDefinition;

pub struct ViewEngine {
    data: ViewData,
    state: ViewState,
    /// Inferred kind of each base column. Recomputed when the base changes.
    kinds: Vec<ColumnKind>,
    /// Displayed rows as indices into the base dataset.
    displayed: Vec<usize>,
    /// Unique display values per column of the original dataset.
    unique_cache: RefCell<HashMap<String, Vec<String>>>,
}

impl ViewEngine {
    pub fn new(dataset: Dataset) -> Self {
        let state = ViewState::initial(&dataset);
        let kinds = infer_column_kinds(&dataset);
        let displayed = (0..dataset.len()).collect();
        ViewEngine {
            data: ViewData::new(dataset),
            state,
            kinds,
            displayed,
            unique_cache: RefCell::new(HashMap::new()),
        }
    }

    // ========================================================================
    // ACTIONS
    // ========================================================================

    /// Applies an action. On error nothing changes.
    pub fn dispatch(&mut self, action: ViewAction) -> Result<(), ViewError> {
        let next = self.state.apply(&self.data, &action)?;

        match &action {
            ViewAction::Pivot(definition) => {
                let base = self.data.base();
                let rows = self.displayed.iter().map(|&i| &base.records()[i]);
                let pivoted = calculate_pivot(definition, base.columns(), rows)?;
                info!(
                    target: "view",
                    "pivot {:?} / {:?}: {} rows -> {} groups",
                    definition.group_by,
                    definition.aggregate_columns,
                    self.displayed.len(),
                    pivoted.len()
                );
                self.data.pivoted = Some(pivoted);
                self.kinds = infer_column_kinds(self.data.base());
            }
            ViewAction::Unpivot => {
                if self.data.pivoted.take().is_some() {
                    self.kinds = infer_column_kinds(&self.data.original);
                }
                info!(target: "view", "restored original dataset ({} rows)", self.data.original.len());
            }
            _ => {}
        }

        self.state = next;
        self.refresh();
        debug!(target: "view", "{:?} -> {} rows displayed", action, self.displayed.len());
        Ok(())
    }

    pub fn apply_filter(&mut self, spec: FilterSpec) -> Result<(), ViewError> {
        self.dispatch(ViewAction::ApplyFilter(spec))
    }

    pub fn clear_filter(&mut self) {
        // Clearing is always valid.
        let _ = self.dispatch(ViewAction::ClearFilter);
    }

    pub fn sort(&mut self, column: &str) -> Result<(), ViewError> {
        self.dispatch(ViewAction::Sort(column.to_string()))
    }

    pub fn move_column(&mut self, column: &str, position: usize) -> Result<(), ViewError> {
        self.dispatch(ViewAction::MoveColumn {
            column: column.to_string(),
            position,
        })
    }

    pub fn pivot(&mut self, group_by: &[String], aggregate_columns: &[String]) -> Result<(), ViewError> {
        self.dispatch(ViewAction::Pivot(PivotDefinition::new(
            group_by.to_vec(),
            aggregate_columns.to_vec(),
        )))
    }

    pub fn unpivot(&mut self) {
        let _ = self.dispatch(ViewAction::Unpivot);
    }

    fn refresh(&mut self) {
        self.displayed = self.state.displayed_rows(self.data.base(), &self.kinds);
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn original(&self) -> &Dataset {
        &self.data.original
    }

    /// The dataset the view is currently built from (original or pivoted).
    pub fn base(&self) -> &Dataset {
        self.data.base()
    }

    pub fn is_pivoted(&self) -> bool {
        self.data.pivoted.is_some()
    }

    pub fn column_order(&self) -> &[String] {
        &self.state.column_order
    }

    pub fn displayed_len(&self) -> usize {
        self.displayed.len()
    }

    /// Inferred kind of a base column.
    pub fn column_kind(&self, column: &str) -> Option<ColumnKind> {
        let col = self.base().column_index(column)?;
        self.kinds.get(col).copied()
    }

    /// Displayed row `row`, with values in column order.
    pub fn displayed_row(&self, row: usize) -> Option<Vec<&CellValue>> {
        let base = self.data.base();
        let record = base.records().get(*self.displayed.get(row)?)?;
        Some(
            self.projection()
                .into_iter()
                .map(|col| record.get(col))
                .collect(),
        )
    }

    /// All displayed records, with values in column order.
    pub fn displayed_records(&self) -> Vec<Record> {
        let base = self.data.base();
        let projection = self.projection();
        self.displayed
            .iter()
            .map(|&i| {
                let record = &base.records()[i];
                Record::new(projection.iter().map(|&col| record.get(col).clone()).collect())
            })
            .collect()
    }

    /// Base column positions in display order.
    fn projection(&self) -> Vec<usize> {
        let base = self.data.base();
        self.state
            .column_order
            .iter()
            .filter_map(|name| base.column_index(name))
            .collect()
    }

    /// Distinct non-empty display values of `column` in the original dataset,
    /// in first-seen order. Cached per column.
    pub fn unique_values(&self, column: &str) -> Result<Vec<String>, ViewError> {
        if let Some(values) = self.unique_cache.borrow().get(column) {
            return Ok(values.clone());
        }

        let values_iter = self
            .data
            .original
            .column_values(column)
            .ok_or_else(|| ViewError::unknown_column(column))?;

        let mut seen = std::collections::HashSet::new();
        let mut values = Vec::new();
        for value in values_iter {
            let text = value.display_value();
            if !text.is_empty() && seen.insert(text.clone()) {
                values.push(text);
            }
        }

        self.unique_cache
            .borrow_mut()
            .insert(column.to_string(), values.clone());
        Ok(values)
    }

    /// Chart points from the displayed rows.
    pub fn chart_series(&self, x: &str, y: &str, y2: Option<&str>) -> Result<ChartSeries, ViewError> {
        let base = self.data.base();
        let rows = self.displayed.iter().map(|&i| &base.records()[i]);
        ChartSeries::build(base, rows, x, y, y2)
    }
}
