//! FILENAME: core/view-engine/src/sort.rs
//! PURPOSE: Single-column sort of the displayed rows.
//! CONTEXT: The comparison follows the column's inferred kind. Empty values
//! go last in both directions. The sort is stable, so rows with equal keys
//! keep their order from the (filtered) base dataset.

use engine::{CellValue, ColumnKind, Dataset};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Direction used the next time a column is sorted.
    /// A column that has never been sorted starts ascending.
    pub fn toggle(previous: Option<SortDirection>) -> SortDirection {
        match previous {
            Some(SortDirection::Ascending) => SortDirection::Descending,
            _ => SortDirection::Ascending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortSpec {
    pub column: String,
    pub direction: SortDirection,
}

/// Compares two non-empty values of a column of the given kind.
fn compare_by_kind(kind: ColumnKind, a: &CellValue, b: &CellValue) -> Ordering {
    match kind {
        ColumnKind::Numeric => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => a.display_value().cmp(&b.display_value()),
        },
        ColumnKind::Date => match (a.as_datetime(), b.as_datetime()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => a.display_value().cmp(&b.display_value()),
        },
        ColumnKind::Text => a.display_value().cmp(&b.display_value()),
    }
}

/// Sorts `rows` (indices into `dataset`) in place by column `col`.
pub fn sort_rows(
    dataset: &Dataset,
    rows: &mut [usize],
    col: usize,
    kind: ColumnKind,
    direction: SortDirection,
) {
    let records = dataset.records();
    rows.sort_by(|&ra, &rb| {
        let a = records[ra].get(col);
        let b = records[rb].get(col);
        match (a.is_empty(), b.is_empty()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let ord = compare_by_kind(kind, a, b);
                match direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            }
        }
    });
}
