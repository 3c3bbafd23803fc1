//! Dataset container handed over by the loading collaborator
//!
//! A dataset owns exactly one matrix plus one annotation table per axis and
//! the name of the designated unique-identifier column for each axis. All
//! shape invariants are enforced here, once, so query paths can assume them.

use hashbrown::HashSet;

use crate::column::{AnnotationTable, Column};
use crate::error::{AdaptorError, Result};
use crate::matrix::MatrixData;

/// Immutable annotated matrix dataset
#[derive(Debug, Clone)]
pub struct Dataset {
    matrix: MatrixData,
    obs: AnnotationTable,
    var: AnnotationTable,
    obs_index: String,
    var_index: String,
}

impl Dataset {
    /// Assemble a dataset, enforcing shape invariants
    ///
    /// The row annotation table must match the matrix row count and the
    /// column annotation table the matrix column count; both designated
    /// index columns must exist. Integrity problems inside an index column
    /// (missing or duplicate values) are reported as warnings, not errors:
    /// the data is served as loaded.
    pub fn new(
        matrix: MatrixData,
        obs: AnnotationTable,
        var: AnnotationTable,
        obs_index: impl Into<String>,
        var_index: impl Into<String>,
    ) -> Result<Self> {
        let obs_index = obs_index.into();
        let var_index = var_index.into();

        if obs.len() != matrix.nrows() {
            return Err(AdaptorError::Dataset(format!(
                "row annotation extent {} does not match matrix rows {}",
                obs.len(),
                matrix.nrows()
            )));
        }
        if var.len() != matrix.ncols() {
            return Err(AdaptorError::Dataset(format!(
                "column annotation extent {} does not match matrix columns {}",
                var.len(),
                matrix.ncols()
            )));
        }

        check_index_integrity(&obs, &obs_index, "obs")?;
        check_index_integrity(&var, &var_index, "var")?;

        Ok(Self {
            matrix,
            obs,
            var,
            obs_index,
            var_index,
        })
    }

    /// The expression matrix
    pub fn matrix(&self) -> &MatrixData {
        &self.matrix
    }

    /// Row (obs) annotation table
    pub fn obs(&self) -> &AnnotationTable {
        &self.obs
    }

    /// Column (var) annotation table
    pub fn var(&self) -> &AnnotationTable {
        &self.var
    }

    /// Name of the row axis unique-identifier column
    pub fn obs_index(&self) -> &str {
        &self.obs_index
    }

    /// Name of the column axis unique-identifier column
    pub fn var_index(&self) -> &str {
        &self.var_index
    }

    /// Matrix row count
    pub fn n_rows(&self) -> usize {
        self.matrix.nrows()
    }

    /// Matrix column count
    pub fn n_cols(&self) -> usize {
        self.matrix.ncols()
    }
}

/// Verify the index column exists and warn on integrity problems
///
/// Duplicate or missing identifier values are a data fault in the loaded
/// file, not a reason to refuse service.
fn check_index_integrity(table: &AnnotationTable, name: &str, axis: &str) -> Result<()> {
    let column = table.get_column(name)?;

    let (missing, duplicates) = match column {
        Column::Str(values) => {
            let mut seen = HashSet::new();
            let mut missing = 0usize;
            let mut duplicates = 0usize;
            for value in values {
                match value {
                    Some(v) => {
                        if !seen.insert(v.as_str()) {
                            duplicates += 1;
                        }
                    }
                    None => missing += 1,
                }
            }
            (missing, duplicates)
        }
        Column::Int(values) => {
            let mut seen = HashSet::new();
            let duplicates = values.iter().filter(|v| !seen.insert(**v)).count();
            (0, duplicates)
        }
        Column::Float(values) => {
            let mut seen = HashSet::new();
            let mut missing = 0usize;
            let mut duplicates = 0usize;
            for value in values {
                if value.is_nan() {
                    missing += 1;
                } else if !seen.insert(value.to_bits()) {
                    duplicates += 1;
                }
            }
            (missing, duplicates)
        }
        Column::Bool(values) => {
            let mut seen = HashSet::new();
            let duplicates = values.iter().filter(|v| !seen.insert(**v)).count();
            (0, duplicates)
        }
    };

    if missing > 0 {
        log::warn!("{axis} index column '{name}' has {missing} missing values");
    }
    if duplicates > 0 {
        log::warn!("{axis} index column '{name}' has {duplicates} duplicate values");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::DenseMatrix;

    fn ids(n: usize, prefix: &str) -> Column {
        Column::Str((0..n).map(|i| Some(format!("{prefix}{i}"))).collect())
    }

    fn small_dataset() -> Result<Dataset> {
        let matrix = MatrixData::Dense(DenseMatrix::new(2, 3, vec![0.0; 6])?);
        let obs = AnnotationTable::new(2).with_column("cell_id", ids(2, "c"))?;
        let var = AnnotationTable::new(3).with_column("gene_id", ids(3, "g"))?;
        Dataset::new(matrix, obs, var, "cell_id", "gene_id")
    }

    #[test]
    fn test_construction() {
        let d = small_dataset().unwrap();
        assert_eq!(d.n_rows(), 2);
        assert_eq!(d.n_cols(), 3);
        assert_eq!(d.obs_index(), "cell_id");
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let matrix = MatrixData::Dense(DenseMatrix::new(2, 3, vec![0.0; 6]).unwrap());
        let obs = AnnotationTable::new(5)
            .with_column("cell_id", ids(5, "c"))
            .unwrap();
        let var = AnnotationTable::new(3)
            .with_column("gene_id", ids(3, "g"))
            .unwrap();
        let err = Dataset::new(matrix, obs, var, "cell_id", "gene_id").unwrap_err();
        assert!(matches!(err, AdaptorError::Dataset(_)));
    }

    #[test]
    fn test_missing_index_column_rejected() {
        let matrix = MatrixData::Dense(DenseMatrix::new(2, 3, vec![0.0; 6]).unwrap());
        let obs = AnnotationTable::new(2)
            .with_column("cell_id", ids(2, "c"))
            .unwrap();
        let var = AnnotationTable::new(3)
            .with_column("gene_id", ids(3, "g"))
            .unwrap();
        let err = Dataset::new(matrix, obs, var, "nope", "gene_id").unwrap_err();
        assert_eq!(err, AdaptorError::ColumnNotFound("nope".to_string()));
    }

    #[test]
    fn test_duplicate_index_values_are_non_fatal() {
        let matrix = MatrixData::Dense(DenseMatrix::new(2, 3, vec![0.0; 6]).unwrap());
        let obs = AnnotationTable::new(2)
            .with_column(
                "cell_id",
                Column::Str(vec![Some("dup".into()), Some("dup".into())]),
            )
            .unwrap();
        let var = AnnotationTable::new(3)
            .with_column("gene_id", ids(3, "g"))
            .unwrap();
        assert!(Dataset::new(matrix, obs, var, "cell_id", "gene_id").is_ok());
    }
}
