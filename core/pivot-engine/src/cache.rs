//! FILENAME: core/pivot-engine/src/cache.rs
//! Pivot Cache - Interned representation used while grouping.
//!
//! Architecture:
//! - Each unique key value is stored once per field and referenced by index
//! - A group is identified by the vector of its fields' value indices
//! - Sums are accumulated per group in a single pass over the records

use chrono::NaiveDateTime;
use engine::{CellValue, Record};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cmp::Ordering;

use crate::definition::ResolvedPivot;

// ============================================================================
// VALUE INTERNING
// ============================================================================

/// A reference to an interned value within a field's unique value store.
pub type ValueId = u32;

/// Represents a "null" or missing value in the cache.
pub const VALUE_ID_EMPTY: ValueId = u32::MAX;

/// A normalized, hashable representation of a cell value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CacheValue {
    Empty,
    Number(OrderedFloat),
    Text(String),
    Date(chrono::NaiveDate),
    DateTime(NaiveDateTime),
}

impl From<&CellValue> for CacheValue {
    fn from(value: &CellValue) -> Self {
        match value {
            CellValue::Empty => CacheValue::Empty,
            CellValue::Number(n) => CacheValue::Number(OrderedFloat(*n)),
            CellValue::Text(s) => CacheValue::Text(s.clone()),
            CellValue::Date(d) => CacheValue::Date(*d),
            CellValue::DateTime(dt) => CacheValue::DateTime(*dt),
        }
    }
}

impl From<&CacheValue> for CellValue {
    fn from(value: &CacheValue) -> Self {
        match value {
            CacheValue::Empty => CellValue::Empty,
            CacheValue::Number(n) => CellValue::Number(n.as_f64()),
            CacheValue::Text(s) => CellValue::Text(s.clone()),
            CacheValue::Date(d) => CellValue::Date(*d),
            CacheValue::DateTime(dt) => CellValue::DateTime(*dt),
        }
    }
}

/// Wrapper around f64 that implements Eq and Hash for use as HashMap keys.
/// NaN values are treated as equal to each other.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderedFloat(pub f64);

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        if self.0.is_nan() && other.0.is_nan() {
            true
        } else {
            self.0 == other.0
        }
    }
}

impl Eq for OrderedFloat {}

impl std::hash::Hash for OrderedFloat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        if self.0.is_nan() {
            // All NaN values hash to the same thing
            u64::MAX.hash(state);
        } else if self.0 == 0.0 {
            // -0.0 == 0.0, so they must hash alike
            0u64.hash(state);
        } else {
            self.0.to_bits().hash(state);
        }
    }
}

impl OrderedFloat {
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

// ============================================================================
// FIELD CACHE
// ============================================================================

/// Unique values of one group-by field. Provides O(1) lookup by ValueId.
#[derive(Debug, Clone, Default)]
pub struct FieldCache {
    value_to_id: FxHashMap<CacheValue, ValueId>,
    id_to_value: Vec<CacheValue>,
}

impl FieldCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a value and returns its ValueId.
    /// If the value already exists, returns the existing ID.
    pub fn intern(&mut self, value: CacheValue) -> ValueId {
        if let CacheValue::Empty = value {
            return VALUE_ID_EMPTY;
        }

        if let Some(&id) = self.value_to_id.get(&value) {
            return id;
        }

        let id = self.id_to_value.len() as ValueId;
        self.id_to_value.push(value.clone());
        self.value_to_id.insert(value, id);
        id
    }

    /// Gets the value for a given ID.
    pub fn get_value(&self, id: ValueId) -> &CacheValue {
        static EMPTY: CacheValue = CacheValue::Empty;
        if id == VALUE_ID_EMPTY {
            return &EMPTY;
        }
        self.id_to_value.get(id as usize).unwrap_or(&EMPTY)
    }
}

/// Comparison function for ordering group keys. Empty sorts first.
pub fn compare_cache_values(a: &CacheValue, b: &CacheValue) -> Ordering {
    engine::compare_values(&CellValue::from(a), &CellValue::from(b))
}

// ============================================================================
// GROUP KEY
// ============================================================================

/// A key representing a unique combination of group-by field values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    /// ValueIds for each group-by field, in definition order.
    pub values: SmallVec<[ValueId; 4]>,
}

impl GroupKey {
    pub fn new(values: SmallVec<[ValueId; 4]>) -> Self {
        GroupKey { values }
    }
}

// ============================================================================
// SUM ACCUMULATOR
// ============================================================================

/// Running sum for one aggregate column within one group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SumAccumulator {
    pub sum: f64,
    pub count_numbers: u64,
    pub count_skipped: u64,
}

impl SumAccumulator {
    pub fn add(&mut self, value: &CellValue) {
        match value.as_f64() {
            Some(n) if !n.is_nan() => {
                self.sum += n;
                self.count_numbers += 1;
            }
            _ => self.count_skipped += 1,
        }
    }
}

// ============================================================================
// MAIN CACHE STRUCT
// ============================================================================

/// Grouped sums built from a record sequence.
#[derive(Debug, Clone)]
pub struct PivotCache {
    /// One interning store per group-by field.
    pub fields: Vec<FieldCache>,

    /// Accumulators keyed by group. The Vec holds one accumulator per value field.
    aggregates: FxHashMap<GroupKey, Vec<SumAccumulator>>,

    /// Groups in order of first appearance.
    first_seen: Vec<GroupKey>,

    value_field_count: usize,
}

impl PivotCache {
    pub fn new(group_field_count: usize, value_field_count: usize) -> Self {
        PivotCache {
            fields: (0..group_field_count).map(|_| FieldCache::new()).collect(),
            aggregates: FxHashMap::default(),
            first_seen: Vec::new(),
            value_field_count,
        }
    }

    /// Builds the cache in one pass over `records`.
    pub fn build<'a>(resolved: &ResolvedPivot, records: impl IntoIterator<Item = &'a Record>) -> Self {
        let mut cache = PivotCache::new(resolved.group_fields.len(), resolved.value_fields.len());
        for record in records {
            cache.add_record(resolved, record);
        }
        cache
    }

    /// Adds one record to its group's accumulators.
    pub fn add_record(&mut self, resolved: &ResolvedPivot, record: &Record) {
        let key_values: SmallVec<[ValueId; 4]> = resolved
            .group_fields
            .iter()
            .zip(self.fields.iter_mut())
            .map(|(&field, cache)| cache.intern(CacheValue::from(record.get(field))))
            .collect();
        let key = GroupKey::new(key_values);

        if !self.aggregates.contains_key(&key) {
            self.first_seen.push(key.clone());
        }
        let value_field_count = self.value_field_count;
        let accumulators = self
            .aggregates
            .entry(key)
            .or_insert_with(|| vec![SumAccumulator::default(); value_field_count]);

        for (acc, &field) in accumulators.iter_mut().zip(resolved.value_fields.iter()) {
            acc.add(record.get(field));
        }
    }

    pub fn group_count(&self) -> usize {
        self.first_seen.len()
    }

    /// Groups in order of first appearance.
    pub fn groups(&self) -> &[GroupKey] {
        &self.first_seen
    }

    pub fn get_aggregate(&self, key: &GroupKey) -> Option<&[SumAccumulator]> {
        self.aggregates.get(key).map(Vec::as_slice)
    }

    /// Resolves a group key back to its field values.
    pub fn key_values<'a>(&'a self, key: &'a GroupKey) -> impl Iterator<Item = &'a CacheValue> + 'a {
        key.values
            .iter()
            .zip(self.fields.iter())
            .map(|(&id, field)| field.get_value(id))
    }

    /// Compares two groups field by field.
    pub fn compare_keys(&self, a: &GroupKey, b: &GroupKey) -> Ordering {
        for (va, vb) in self.key_values(a).zip(self.key_values(b)) {
            let ord = compare_cache_values(va, vb);
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}
