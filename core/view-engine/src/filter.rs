//! FILENAME: core/view-engine/src/filter.rs
//! PURPOSE: Column filters for the displayed view.
//! CONTEXT: Filters match against a value's display text, the same text the
//! unique-value chooser offers, so a value picked from the chooser always
//! matches its own rows.

use engine::{CellValue, Dataset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::ViewError;

/// How a filter selects rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterCriterion {
    /// Keep rows whose text is one of the values.
    Include(BTreeSet<String>),
    /// Keep rows whose text is none of the values.
    Exclude(BTreeSet<String>),
    /// Keep rows whose text contains the pattern (case-insensitive).
    Contains(String),
}

/// A filter on a single column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    pub column: String,
    pub criterion: FilterCriterion,
}

impl FilterSpec {
    pub fn include<I, S>(column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterSpec {
            column: column.to_string(),
            criterion: FilterCriterion::Include(values.into_iter().map(Into::into).collect()),
        }
    }

    pub fn exclude<I, S>(column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterSpec {
            column: column.to_string(),
            criterion: FilterCriterion::Exclude(values.into_iter().map(Into::into).collect()),
        }
    }

    pub fn contains(column: &str, pattern: &str) -> Self {
        FilterSpec {
            column: column.to_string(),
            criterion: FilterCriterion::Contains(pattern.to_string()),
        }
    }

    /// Checks the filter against the dataset it will run on and returns the
    /// column position.
    pub fn validate(&self, dataset: &Dataset) -> Result<usize, ViewError> {
        if self.column.trim().is_empty() {
            return Err(ViewError::InvalidFilter("no column selected".to_string()));
        }
        let missing_criterion = match &self.criterion {
            FilterCriterion::Include(values) | FilterCriterion::Exclude(values) => values.is_empty(),
            FilterCriterion::Contains(pattern) => pattern.is_empty(),
        };
        if missing_criterion {
            return Err(ViewError::InvalidFilter(format!(
                "no filter value given for column '{}'",
                self.column
            )));
        }
        dataset
            .column_index(&self.column)
            .ok_or_else(|| ViewError::InvalidFilter(format!("unknown column '{}'", self.column)))
    }

    /// Tests a single value.
    pub fn matches(&self, value: &CellValue) -> bool {
        let text = value.display_value();
        match &self.criterion {
            FilterCriterion::Include(values) => values.contains(&text),
            FilterCriterion::Exclude(values) => !values.contains(&text),
            FilterCriterion::Contains(pattern) => {
                text.to_lowercase().contains(&pattern.to_lowercase())
            }
        }
    }
}
