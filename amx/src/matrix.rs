//! In-memory matrix storage, dense and sparse
//!
//! The expression matrix is handed to the adaptor fully loaded, either as a
//! row-major dense array or in compressed sparse row form. Both storages
//! are read-only after construction and validated up front so that query
//! paths never re-check structure.

use amx_core::ElementType;

use crate::error::{AdaptorError, Result};

/// Row-major dense matrix of f64 values
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    nrows: usize,
    ncols: usize,
    values: Vec<f64>,
}

impl DenseMatrix {
    /// Create a dense matrix from row-major values
    pub fn new(nrows: usize, ncols: usize, values: Vec<f64>) -> Result<Self> {
        let expected = nrows.checked_mul(ncols).ok_or_else(|| {
            AdaptorError::Dataset(format!("matrix shape {nrows}x{ncols} overflows"))
        })?;
        if values.len() != expected {
            return Err(AdaptorError::Dataset(format!(
                "dense matrix has {} values, shape {nrows}x{ncols} needs {expected}",
                values.len()
            )));
        }
        Ok(Self {
            nrows,
            ncols,
            values,
        })
    }

    /// Number of rows
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Element at (row, col); callers must pass in-bounds indices
    pub fn get(&self, row: usize, col: usize) -> f64 {
        debug_assert!(row < self.nrows && col < self.ncols);
        self.values[row * self.ncols + col]
    }
}

/// Compressed sparse row matrix of f64 values
///
/// Entries absent from the sparsity pattern read as 0.0. Column indices
/// must be strictly ascending within each row.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    nrows: usize,
    ncols: usize,
    indptr: Vec<usize>,
    indices: Vec<u32>,
    data: Vec<f64>,
}

impl CsrMatrix {
    /// Create a CSR matrix, validating the sparsity structure
    pub fn new(
        nrows: usize,
        ncols: usize,
        indptr: Vec<usize>,
        indices: Vec<u32>,
        data: Vec<f64>,
    ) -> Result<Self> {
        if indptr.len() != nrows + 1 {
            return Err(AdaptorError::Dataset(format!(
                "indptr has {} entries, expected {}",
                indptr.len(),
                nrows + 1
            )));
        }
        if indptr[0] != 0 {
            return Err(AdaptorError::Dataset("indptr must start at 0".to_string()));
        }
        if indices.len() != data.len() {
            return Err(AdaptorError::Dataset(format!(
                "indices ({}) and data ({}) lengths differ",
                indices.len(),
                data.len()
            )));
        }
        if *indptr.last().unwrap_or(&0) != indices.len() {
            return Err(AdaptorError::Dataset(
                "indptr does not cover all stored entries".to_string(),
            ));
        }
        for row in 0..nrows {
            if indptr[row] > indptr[row + 1] {
                return Err(AdaptorError::Dataset(format!(
                    "indptr not monotonic at row {row}"
                )));
            }
            let cols = &indices[indptr[row]..indptr[row + 1]];
            for pair in cols.windows(2) {
                if pair[0] >= pair[1] {
                    return Err(AdaptorError::Dataset(format!(
                        "column indices not strictly ascending in row {row}"
                    )));
                }
            }
            if let Some(&last) = cols.last() {
                if last as usize >= ncols {
                    return Err(AdaptorError::Dataset(format!(
                        "column index {last} out of bounds in row {row}"
                    )));
                }
            }
        }
        Ok(Self {
            nrows,
            ncols,
            indptr,
            indices,
            data,
        })
    }

    /// Number of rows
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// Element at (row, col); absent entries read as 0.0
    pub fn get(&self, row: usize, col: usize) -> f64 {
        debug_assert!(row < self.nrows && col < self.ncols);
        let cols = &self.indices[self.indptr[row]..self.indptr[row + 1]];
        match cols.binary_search(&(col as u32)) {
            Ok(pos) => self.data[self.indptr[row] + pos],
            Err(_) => 0.0,
        }
    }
}

/// Matrix storage handed to the adaptor by the loading collaborator
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixData {
    /// Row-major dense storage
    Dense(DenseMatrix),
    /// Compressed sparse row storage
    Sparse(CsrMatrix),
}

impl MatrixData {
    /// Number of rows
    pub fn nrows(&self) -> usize {
        match self {
            MatrixData::Dense(m) => m.nrows(),
            MatrixData::Sparse(m) => m.nrows(),
        }
    }

    /// Number of columns
    pub fn ncols(&self) -> usize {
        match self {
            MatrixData::Dense(m) => m.ncols(),
            MatrixData::Sparse(m) => m.ncols(),
        }
    }

    /// Element type of the matrix on the wire
    pub fn element_type(&self) -> ElementType {
        ElementType::F64
    }

    /// Element at (row, col)
    pub fn get(&self, row: usize, col: usize) -> f64 {
        match self {
            MatrixData::Dense(m) => m.get(row, col),
            MatrixData::Sparse(m) => m.get(row, col),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_shape_validation() {
        assert!(DenseMatrix::new(2, 3, vec![0.0; 6]).is_ok());
        assert!(DenseMatrix::new(2, 3, vec![0.0; 5]).is_err());
    }

    #[test]
    fn test_dense_get() {
        let m = DenseMatrix::new(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(m.get(0, 0), 1.0);
        assert_eq!(m.get(1, 2), 6.0);
    }

    #[test]
    fn test_csr_structure_validation() {
        // valid 2x3 with entries (0,1)=5.0 and (1,2)=7.0
        let m = CsrMatrix::new(2, 3, vec![0, 1, 2], vec![1, 2], vec![5.0, 7.0]).unwrap();
        assert_eq!(m.nnz(), 2);

        // indptr wrong length
        assert!(CsrMatrix::new(2, 3, vec![0, 2], vec![1, 2], vec![5.0, 7.0]).is_err());
        // column index out of bounds
        assert!(CsrMatrix::new(2, 3, vec![0, 1, 2], vec![1, 3], vec![5.0, 7.0]).is_err());
        // duplicate column in one row
        assert!(CsrMatrix::new(1, 3, vec![0, 2], vec![1, 1], vec![5.0, 7.0]).is_err());
    }

    #[test]
    fn test_csr_get_with_implicit_zeros() {
        let m = CsrMatrix::new(2, 3, vec![0, 1, 2], vec![1, 2], vec![5.0, 7.0]).unwrap();
        assert_eq!(m.get(0, 0), 0.0);
        assert_eq!(m.get(0, 1), 5.0);
        assert_eq!(m.get(1, 2), 7.0);
        assert_eq!(m.get(1, 0), 0.0);
    }
}
