//! The annotated matrix adaptor: a uniform query surface over one dataset
//!
//! The adaptor owns the loaded dataset, derives the schema exactly once at
//! construction, and answers per-request encode operations. Every method
//! takes `&self`; nothing is mutated after construction, so one adaptor
//! serves unlimited concurrent readers without locking.

use crate::column::{AnnotationTable, Column};
use crate::dataset::Dataset;
use crate::encode;
use crate::error::{AdaptorError, Result};
use crate::filter::{self, DataFilter};
use crate::schema::{Schema, SchemaConfig};
use crate::view::MatrixView;

/// One of the two matrix axes
///
/// `Obs` is the row axis (cells), `Var` the column axis (genes); each has
/// its own annotation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Row axis
    Obs,
    /// Column axis
    Var,
}

impl Axis {
    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::Obs => "obs",
            Axis::Var => "var",
        }
    }
}

impl core::fmt::Display for Axis {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl core::str::FromStr for Axis {
    type Err = AdaptorError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "obs" => Ok(Axis::Obs),
            "var" => Ok(Axis::Var),
            other => Err(AdaptorError::Filter(format!("unknown axis '{other}'"))),
        }
    }
}

/// Query surface over one annotated matrix dataset
#[derive(Debug)]
pub struct MatrixAdaptor {
    dataset: Dataset,
    schema: Schema,
}

impl MatrixAdaptor {
    /// Wrap a dataset, deriving the schema with default configuration
    pub fn new(dataset: Dataset) -> Self {
        Self::with_config(dataset, SchemaConfig::default())
    }

    /// Wrap a dataset, deriving the schema with the given configuration
    pub fn with_config(dataset: Dataset, config: SchemaConfig) -> Self {
        let schema = Schema::build(&dataset, &config);
        Self { dataset, schema }
    }

    /// The cached schema
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The underlying dataset
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Encode the whole annotation table for one axis
    pub fn annotation_frame(&self, axis: Axis) -> Result<Vec<u8>> {
        let (table, axis_schema) = match axis {
            Axis::Obs => (self.dataset.obs(), &self.schema.obs),
            Axis::Var => (self.dataset.var(), &self.schema.var),
        };
        encode::encode_annotation_frame(table, axis_schema)
    }

    /// Encode a filtered slice of the expression matrix as a dataframe
    ///
    /// Only the var axis is encodable this way; requesting the obs axis is
    /// a fixed limitation of this design, reported as `Unsupported` rather
    /// than a filter failure. The optional `filter` restricts rows via its
    /// obs block and columns via its var block; selections are
    /// canonicalized to ascending index order before use.
    pub fn data_frame(
        &self,
        raw_filter: Option<&serde_json::Value>,
        axis: Axis,
    ) -> Result<Vec<u8>> {
        if axis == Axis::Obs {
            return Err(AdaptorError::Unsupported(
                "obs-axis matrix dataframe encoding",
            ));
        }

        let parsed = match raw_filter {
            Some(raw) => DataFilter::from_value(raw)?,
            None => DataFilter::default(),
        };

        let rows = filter::normalize(parsed.obs.as_ref(), self.dataset.obs())?;
        let cols = filter::normalize(parsed.var.as_ref(), self.dataset.var())?;
        let view = MatrixView::new(self.dataset.matrix(), rows, cols);

        let names = column_labels(
            self.dataset.var(),
            self.dataset.var_index(),
            &view.col_indices(),
        )?;
        encode::encode_matrix_frame(&view, &names)
    }
}

/// Labels for selected matrix columns, drawn from the axis index column
fn column_labels(
    table: &AnnotationTable,
    index_name: &str,
    cols: &[u32],
) -> Result<Vec<String>> {
    let column = table.get_column(index_name)?;
    let labels = cols
        .iter()
        .map(|&i| {
            let i = i as usize;
            match column {
                Column::Str(v) => v[i].clone().unwrap_or_else(|| i.to_string()),
                Column::Int(v) => v[i].to_string(),
                Column::Float(v) => v[i].to_string(),
                Column::Bool(v) => v[i].to_string(),
            }
        })
        .collect();
    Ok(labels)
}
