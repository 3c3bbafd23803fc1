//! Read-only filtered projection over the matrix
//!
//! A view pairs the backing matrix with one normalized selection per axis.
//! Nothing is copied at construction; a dense gather happens per column,
//! only for the selected rows, at the moment the encoder needs numeric
//! values. Sparse storage is never expanded beyond the selected sub-view.

use crate::filter::Selection;
use crate::matrix::MatrixData;

/// Filtered projection of the matrix for one encode operation
#[derive(Debug)]
pub struct MatrixView<'a> {
    matrix: &'a MatrixData,
    rows: Selection,
    cols: Selection,
}

impl<'a> MatrixView<'a> {
    /// Create a view over the matrix with the given selections
    ///
    /// `All`/`All` is the identity view. Selections are assumed to be
    /// normalized (ascending, deduplicated, in bounds) by the filter
    /// engine; the view preserves that order.
    pub fn new(matrix: &'a MatrixData, rows: Selection, cols: Selection) -> Self {
        Self { matrix, rows, cols }
    }

    /// Number of rows in the projection
    pub fn row_count(&self) -> usize {
        self.rows.count(self.matrix.nrows())
    }

    /// Number of columns in the projection
    pub fn col_count(&self) -> usize {
        self.cols.count(self.matrix.ncols())
    }

    /// Global column indices of the projection, in selection order
    pub fn col_indices(&self) -> Vec<u32> {
        match &self.cols {
            Selection::All => (0..self.matrix.ncols() as u32).collect(),
            Selection::Indices(indices) => indices.clone(),
        }
    }

    /// Materialize one matrix column for the selected rows
    ///
    /// This is the only point where sparse data densifies, and the
    /// allocation is bounded by the row selection, not the full matrix.
    pub fn gather_column(&self, col: u32) -> Vec<f64> {
        let col = col as usize;
        match &self.rows {
            Selection::All => (0..self.matrix.nrows())
                .map(|row| self.matrix.get(row, col))
                .collect(),
            Selection::Indices(rows) => rows
                .iter()
                .map(|&row| self.matrix.get(row as usize, col))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{CsrMatrix, DenseMatrix};

    fn dense() -> MatrixData {
        // 3x3: row-major 0..9
        MatrixData::Dense(
            DenseMatrix::new(3, 3, (0..9).map(f64::from).collect()).unwrap(),
        )
    }

    #[test]
    fn test_identity_view() {
        let m = dense();
        let view = MatrixView::new(&m, Selection::All, Selection::All);
        assert_eq!(view.row_count(), 3);
        assert_eq!(view.col_count(), 3);
        assert_eq!(view.col_indices(), vec![0, 1, 2]);
        assert_eq!(view.gather_column(1), vec![1.0, 4.0, 7.0]);
    }

    #[test]
    fn test_row_selection_order_preserved() {
        let m = dense();
        let view = MatrixView::new(&m, Selection::Indices(vec![0, 2]), Selection::All);
        assert_eq!(view.row_count(), 2);
        assert_eq!(view.gather_column(0), vec![0.0, 6.0]);
    }

    #[test]
    fn test_sparse_gather_fills_zeros() {
        // 3x3 with (0,1)=5.0, (2,2)=9.0
        let m = MatrixData::Sparse(
            CsrMatrix::new(3, 3, vec![0, 1, 1, 2], vec![1, 2], vec![5.0, 9.0]).unwrap(),
        );
        let view = MatrixView::new(&m, Selection::Indices(vec![0, 2]), Selection::All);
        assert_eq!(view.gather_column(1), vec![5.0, 0.0]);
        assert_eq!(view.gather_column(2), vec![0.0, 9.0]);
        assert_eq!(view.gather_column(0), vec![0.0, 0.0]);
    }
}
