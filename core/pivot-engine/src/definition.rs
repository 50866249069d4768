//! FILENAME: core/pivot-engine/src/definition.rs
//! Pivot Definition - The serializable configuration.
//!
//! Describes which columns form the group key and which columns are summed.
//! Validation against a concrete column list happens here so the calculator
//! can assume every referenced column exists.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Index into the source data columns (0-based).
pub type FieldIndex = usize;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PivotError {
    #[error("unknown columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("select at least one group-by column and one sum column")]
    EmptySelection,

    #[error("column used more than once: {0}")]
    DuplicateColumn(String),

    #[error(transparent)]
    Dataset(#[from] engine::DatasetError),
}

/// A group-by/sum pivot over named columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotDefinition {
    /// Key columns, in output order.
    pub group_by: Vec<String>,

    /// Columns summed within each group, in output order.
    pub aggregate_columns: Vec<String>,
}

/// A definition whose column names have been resolved to source positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPivot {
    pub group_fields: Vec<FieldIndex>,
    pub value_fields: Vec<FieldIndex>,
}

impl PivotDefinition {
    pub fn new(group_by: Vec<String>, aggregate_columns: Vec<String>) -> Self {
        PivotDefinition {
            group_by,
            aggregate_columns,
        }
    }

    /// Output column names: group-by columns followed by aggregate columns.
    pub fn output_columns(&self) -> Vec<String> {
        self.group_by
            .iter()
            .chain(self.aggregate_columns.iter())
            .cloned()
            .collect()
    }

    /// Resolves every referenced column against `columns`.
    /// All missing names are reported together.
    pub fn resolve(&self, columns: &[String]) -> Result<ResolvedPivot, PivotError> {
        if self.group_by.is_empty() || self.aggregate_columns.is_empty() {
            return Err(PivotError::EmptySelection);
        }

        let mut missing = Vec::new();
        let mut seen: Vec<&str> = Vec::new();
        for name in self.group_by.iter().chain(self.aggregate_columns.iter()) {
            if seen.contains(&name.as_str()) {
                return Err(PivotError::DuplicateColumn(name.clone()));
            }
            seen.push(name);
            if !columns.contains(name) && !missing.contains(name) {
                missing.push(name.clone());
            }
        }
        if !missing.is_empty() {
            return Err(PivotError::MissingColumns(missing));
        }

        let position = |name: &String| columns.iter().position(|c| c == name).unwrap_or_default();
        Ok(ResolvedPivot {
            group_fields: self.group_by.iter().map(position).collect(),
            value_fields: self.aggregate_columns.iter().map(position).collect(),
        })
    }
}
