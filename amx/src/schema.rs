//! Schema derivation over a loaded dataset
//!
//! The schema is computed exactly once, right after the dataset is handed
//! over, and cached for the adaptor's lifetime. It records axis extents,
//! the matrix element type, and a descriptor per annotation column: the
//! semantic value type, whether values may be missing, and the ordered
//! category domain for categorical columns. Derivation is deterministic,
//! so repeated builds over the same dataset always agree.

use amx_core::ElementType;
use hashbrown::HashSet;

use crate::column::{AnnotationTable, Column};
use crate::dataset::Dataset;

/// Semantic value type of an annotation column
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// 64-bit float values
    Float,
    /// 64-bit signed integer values
    Int,
    /// Boolean values
    Bool,
    /// Strings drawn from a small closed domain
    Categorical,
    /// Free-form strings
    String,
}

/// Descriptor for one annotation column
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct AnnotationColumn {
    /// Column name
    pub name: String,
    /// Semantic value type
    pub value_type: ColumnType,
    /// Whether the column contains missing values (NaN or missing marker)
    pub nullable: bool,
    /// Category domain in first-seen order, categorical columns only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
}

/// Schema for one axis: index column name plus ordered column descriptors
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct AxisSchema {
    /// Name of the designated unique-identifier column
    pub index: String,
    /// Column descriptors in the table's declared order
    pub columns: Vec<AnnotationColumn>,
}

impl AxisSchema {
    /// Look up a column descriptor by name
    pub fn column(&self, name: &str) -> Option<&AnnotationColumn> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Derived description of a dataset's shape and annotation types
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Schema {
    /// Matrix row count
    pub row_count: usize,
    /// Matrix column count
    pub col_count: usize,
    /// Element type of the matrix on the wire
    pub matrix_type: ElementType,
    /// Row axis schema
    pub obs: AxisSchema,
    /// Column axis schema
    pub var: AxisSchema,
}

/// Configuration for schema derivation
#[derive(Debug, Clone)]
pub struct SchemaConfig {
    max_categories: usize,
}

impl SchemaConfig {
    /// Maximum distinct string values for a column to classify categorical
    pub fn with_max_categories(mut self, max_categories: usize) -> Self {
        self.max_categories = max_categories;
        self
    }

    /// Get the categorical classification limit
    pub fn max_categories(&self) -> usize {
        self.max_categories
    }
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            max_categories: 100,
        }
    }
}

impl Schema {
    /// Derive the schema for a dataset
    ///
    /// Idempotent and deterministic for a fixed dataset; the adaptor calls
    /// this once at construction and callers read the cached value.
    pub fn build(dataset: &Dataset, config: &SchemaConfig) -> Self {
        Self {
            row_count: dataset.n_rows(),
            col_count: dataset.n_cols(),
            matrix_type: dataset.matrix().element_type(),
            obs: classify_axis(dataset.obs(), dataset.obs_index(), config),
            var: classify_axis(dataset.var(), dataset.var_index(), config),
        }
    }

    /// Schema for the given axis
    pub fn axis(&self, axis: crate::adaptor::Axis) -> &AxisSchema {
        match axis {
            crate::adaptor::Axis::Obs => &self.obs,
            crate::adaptor::Axis::Var => &self.var,
        }
    }
}

fn classify_axis(table: &AnnotationTable, index: &str, config: &SchemaConfig) -> AxisSchema {
    let columns = table
        .columns()
        .map(|(name, column)| classify_column(name, column, name == index, config))
        .collect();
    AxisSchema {
        index: index.to_string(),
        columns,
    }
}

/// Classify one column's semantic type and nullability
///
/// The designated index column is excluded from categorical and nullable
/// classification: identifiers are served as plain unique strings (or
/// integers) even when their contents look otherwise.
fn classify_column(
    name: &str,
    column: &Column,
    is_index: bool,
    config: &SchemaConfig,
) -> AnnotationColumn {
    let (value_type, nullable, categories) = match column {
        Column::Float(values) => (
            ColumnType::Float,
            !is_index && values.iter().any(|v| v.is_nan()),
            None,
        ),
        Column::Int(_) => (ColumnType::Int, false, None),
        Column::Bool(_) => (ColumnType::Bool, false, None),
        Column::Str(values) => {
            let nullable = !is_index && values.iter().any(Option::is_none);
            if is_index {
                (ColumnType::String, false, None)
            } else {
                match category_domain(values, config.max_categories()) {
                    Some(domain) => (ColumnType::Categorical, nullable, Some(domain)),
                    None => (ColumnType::String, nullable, None),
                }
            }
        }
    };

    AnnotationColumn {
        name: name.to_string(),
        value_type,
        nullable,
        categories,
    }
}

/// Collect the distinct values of a string column in first-seen order
///
/// Returns None once the distinct count exceeds `max_categories`, meaning
/// the column stays a free-form string column.
fn category_domain(values: &[Option<String>], max_categories: usize) -> Option<Vec<String>> {
    let mut seen = HashSet::new();
    let mut domain = Vec::new();
    for value in values.iter().flatten() {
        if seen.insert(value.as_str()) {
            if domain.len() == max_categories {
                return None;
            }
            domain.push(value.clone());
        }
    }
    Some(domain)
}
