//! Filter parsing and normalization
//!
//! A raw filter arrives from the client as JSON, one optional block per
//! axis, each combining explicit index lists, half-open index ranges,
//! categorical membership and numeric range predicates. Normalization
//! turns each axis block into a bounds-checked, deduplicated, ascending
//! index selection; predicates on the same axis compose with AND
//! semantics. Any structural problem fails the whole filter - a partial
//! selection is never produced.

use amx_core::validation::{validate_index, validate_range};
use hashbrown::HashSet;
use serde::Deserialize;

use crate::column::{AnnotationTable, Column};
use crate::error::{AdaptorError, Result};

/// Raw filter structure, one optional block per axis
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataFilter {
    /// Row axis predicates
    #[serde(default)]
    pub obs: Option<AxisFilter>,
    /// Column axis predicates
    #[serde(default)]
    pub var: Option<AxisFilter>,
}

/// Predicates restricting one axis
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AxisFilter {
    /// Explicit indices and half-open index ranges, combined by union
    #[serde(default)]
    pub index: Option<Vec<IndexSpec>>,
    /// Per-column value predicates, combined by intersection
    #[serde(default)]
    pub annotation_value: Option<Vec<ValueFilter>>,
}

/// One entry of an index predicate: a single index or a `[start, stop)` pair
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IndexSpec {
    /// A single explicit index
    Single(i64),
    /// A half-open range `[start, stop)`
    Range([i64; 2]),
}

/// Value predicate against one annotation column
///
/// Either `values` (membership, for string/categorical/bool/int columns)
/// or `min`/`max` (inclusive numeric range, for float/int columns).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValueFilter {
    /// Annotation column name
    pub name: String,
    /// Membership values
    #[serde(default)]
    pub values: Option<Vec<serde_json::Value>>,
    /// Inclusive lower bound
    #[serde(default)]
    pub min: Option<f64>,
    /// Inclusive upper bound
    #[serde(default)]
    pub max: Option<f64>,
}

impl DataFilter {
    /// Parse a raw JSON filter, rejecting malformed shapes
    pub fn from_value(raw: &serde_json::Value) -> Result<Self> {
        serde_json::from_value(raw.clone())
            .map_err(|err| AdaptorError::Filter(format!("malformed filter structure: {err}")))
    }
}

/// Normalized selection along one axis
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every index, in natural order
    All,
    /// Explicit indices: bounds-checked, deduplicated, ascending
    Indices(Vec<u32>),
}

impl Selection {
    /// Number of selected indices for an axis of the given extent
    pub fn count(&self, extent: usize) -> usize {
        match self {
            Selection::All => extent,
            Selection::Indices(indices) => indices.len(),
        }
    }

    /// Whether this selection keeps the whole axis
    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }
}

/// Resolve an axis filter block to a concrete selection
///
/// Absent blocks select everything. Out-of-order and duplicate explicit
/// indices are canonicalized (sorted ascending, deduplicated); any
/// out-of-bounds index or bound invalidates the whole filter.
pub fn normalize(filter: Option<&AxisFilter>, table: &AnnotationTable) -> Result<Selection> {
    let filter = match filter {
        Some(f) => f,
        None => return Ok(Selection::All),
    };

    let extent = table.len();
    let mut restrictions: Vec<Vec<u32>> = Vec::new();

    if let Some(specs) = &filter.index {
        restrictions.push(resolve_index_specs(specs, extent)?);
    }

    if let Some(value_filters) = &filter.annotation_value {
        for vf in value_filters {
            restrictions.push(resolve_value_filter(vf, table)?);
        }
    }

    let mut restrictions = restrictions.into_iter();
    let first = match restrictions.next() {
        Some(set) => set,
        None => return Ok(Selection::All),
    };
    let combined = restrictions.fold(first, |acc, set| intersect_sorted(&acc, &set));

    Ok(Selection::Indices(combined))
}

/// Union of all index entries, canonicalized to sorted unique order
fn resolve_index_specs(specs: &[IndexSpec], extent: usize) -> Result<Vec<u32>> {
    let mut indices: Vec<u32> = Vec::new();
    for spec in specs {
        match spec {
            IndexSpec::Single(index) => {
                let index = validate_index(*index, extent).map_err(|_| {
                    AdaptorError::Filter(format!(
                        "index {index} out of bounds for axis of extent {extent}"
                    ))
                })?;
                indices.push(index as u32);
            }
            IndexSpec::Range([start, stop]) => {
                validate_range(*start, *stop, extent).map_err(|_| {
                    AdaptorError::Filter(format!(
                        "range [{start}, {stop}) invalid for axis of extent {extent}"
                    ))
                })?;
                indices.extend(*start as u32..*stop as u32);
            }
        }
    }
    indices.sort_unstable();
    indices.dedup();
    Ok(indices)
}

/// Resolve one per-column value predicate to a sorted index set
fn resolve_value_filter(vf: &ValueFilter, table: &AnnotationTable) -> Result<Vec<u32>> {
    let column = match table.get_column(&vf.name) {
        Ok(column) => column,
        Err(_) => {
            return Err(AdaptorError::Filter(format!(
                "unknown annotation column '{}'",
                vf.name
            )))
        }
    };

    match (&vf.values, vf.min.is_some() || vf.max.is_some()) {
        (Some(_), true) => Err(AdaptorError::Filter(format!(
            "predicate on '{}' combines membership and range",
            vf.name
        ))),
        (None, false) => Err(AdaptorError::Filter(format!(
            "predicate on '{}' has neither values nor min/max",
            vf.name
        ))),
        (Some(values), false) => resolve_membership(vf, values, column),
        (None, true) => resolve_numeric_range(vf, column),
    }
}

fn resolve_membership(
    vf: &ValueFilter,
    values: &[serde_json::Value],
    column: &Column,
) -> Result<Vec<u32>> {
    let mut indices = Vec::new();
    match column {
        Column::Str(entries) => {
            let mut wanted = HashSet::new();
            for value in values {
                let s = value.as_str().ok_or_else(|| {
                    AdaptorError::Filter(format!(
                        "membership value for string column '{}' is not a string",
                        vf.name
                    ))
                })?;
                wanted.insert(s);
            }
            for (i, entry) in entries.iter().enumerate() {
                if let Some(v) = entry {
                    if wanted.contains(v.as_str()) {
                        indices.push(i as u32);
                    }
                }
            }
        }
        Column::Int(entries) => {
            let mut wanted = HashSet::new();
            for value in values {
                let v = value.as_i64().ok_or_else(|| {
                    AdaptorError::Filter(format!(
                        "membership value for int column '{}' is not an integer",
                        vf.name
                    ))
                })?;
                wanted.insert(v);
            }
            for (i, v) in entries.iter().enumerate() {
                if wanted.contains(v) {
                    indices.push(i as u32);
                }
            }
        }
        Column::Bool(entries) => {
            let mut wanted = HashSet::new();
            for value in values {
                let v = value.as_bool().ok_or_else(|| {
                    AdaptorError::Filter(format!(
                        "membership value for bool column '{}' is not a boolean",
                        vf.name
                    ))
                })?;
                wanted.insert(v);
            }
            for (i, v) in entries.iter().enumerate() {
                if wanted.contains(v) {
                    indices.push(i as u32);
                }
            }
        }
        Column::Float(_) => {
            return Err(AdaptorError::Filter(format!(
                "membership predicate not supported for float column '{}'",
                vf.name
            )))
        }
    }
    Ok(indices)
}

fn resolve_numeric_range(vf: &ValueFilter, column: &Column) -> Result<Vec<u32>> {
    let min = vf.min.unwrap_or(f64::NEG_INFINITY);
    let max = vf.max.unwrap_or(f64::INFINITY);

    let mut indices = Vec::new();
    match column {
        Column::Float(entries) => {
            // NaN entries never match a range predicate
            for (i, v) in entries.iter().enumerate() {
                if *v >= min && *v <= max {
                    indices.push(i as u32);
                }
            }
        }
        Column::Int(entries) => {
            for (i, v) in entries.iter().enumerate() {
                let v = *v as f64;
                if v >= min && v <= max {
                    indices.push(i as u32);
                }
            }
        }
        Column::Bool(_) | Column::Str(_) => {
            return Err(AdaptorError::Filter(format!(
                "range predicate not supported for {} column '{}'",
                column.type_name(),
                vf.name
            )))
        }
    }
    Ok(indices)
}

/// Intersect two sorted unique index sets
fn intersect_sorted(a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            core::cmp::Ordering::Less => i += 1,
            core::cmp::Ordering::Greater => j += 1,
            core::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}
