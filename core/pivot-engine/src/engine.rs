//! FILENAME: core/pivot-engine/src/engine.rs
//! Pivot Engine - Turns a record sequence into a grouped, summed Dataset.
//!
//! Algorithm:
//! 1. Resolve the definition's column names against the source columns
//! 2. Intern each record's key values and accumulate sums per group
//! 3. Order groups by key (field by field, empty first)
//! 4. Emit one record per group: key values followed by the sums

use engine::{CellValue, Dataset, Record};
use log::debug;

use crate::cache::PivotCache;
use crate::definition::{PivotDefinition, PivotError};

// ============================================================================
// PUBLIC API
// ============================================================================

/// Calculates a pivot from `records`, whose values are laid out by `columns`.
/// This is the main entry point for the calculation engine.
pub fn calculate_pivot<'a>(
    definition: &PivotDefinition,
    columns: &[String],
    records: impl IntoIterator<Item = &'a Record>,
) -> Result<Dataset, PivotError> {
    let resolved = definition.resolve(columns)?;
    let cache = PivotCache::build(&resolved, records);

    let mut groups = cache.groups().to_vec();
    // Stable, so keys that compare equal keep first-seen order.
    groups.sort_by(|a, b| cache.compare_keys(a, b));

    let mut output = Dataset::new(definition.output_columns())?;
    for key in &groups {
        let mut values: Vec<CellValue> = cache.key_values(key).map(CellValue::from).collect();
        if let Some(sums) = cache.get_aggregate(key) {
            values.extend(sums.iter().map(|acc| CellValue::number(acc.sum)));
        }
        output.push_record(Record::new(values))?;
    }

    debug!(
        target: "pivot",
        "grouped by {:?}: {} groups, {} sum columns",
        definition.group_by,
        output.len(),
        definition.aggregate_columns.len()
    );
    Ok(output)
}
