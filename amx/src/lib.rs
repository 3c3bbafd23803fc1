//! AMX - Filtered Annotated Matrix Adaptor
//!
//! This library serves slices of a large annotated matrix (rows x columns
//! plus per-axis metadata tables) in a compact binary columnar format,
//! with server-side filtering and schema introspection so clients never
//! hold the full dataset.
//!
//! ## Architecture
//!
//! AMX follows a clean specification/implementation separation:
//!
//! - **amx-core**: Pure wire-format definitions and validation (no I/O)
//! - **amx**: The adaptor - typed columns, schema derivation, filtering,
//!   views and frame encoding
//!
//! ## Quick Start
//!
//! ```rust
//! use amx::{
//!     AnnotationTable, Axis, Column, Dataset, DenseMatrix, MatrixAdaptor, MatrixData,
//! };
//!
//! fn example() -> amx::Result<()> {
//!     let matrix = MatrixData::Dense(DenseMatrix::new(2, 2, vec![0.5, 1.0, 0.0, 2.5])?);
//!     let obs = AnnotationTable::new(2)
//!         .with_column("cell_id", Column::Str(vec![Some("c0".into()), Some("c1".into())]))?;
//!     let var = AnnotationTable::new(2)
//!         .with_column("gene_id", Column::Str(vec![Some("g0".into()), Some("g1".into())]))?;
//!
//!     let adaptor = MatrixAdaptor::new(Dataset::new(matrix, obs, var, "cell_id", "gene_id")?);
//!     let bytes = adaptor.data_frame(None, Axis::Var)?;
//!     let frame = amx::decode_frame(&bytes)?;
//!     assert_eq!(frame.row_count, 2);
//!     Ok(())
//! }
//! example().unwrap();
//! ```
//!
//! ## Guarantees
//!
//! - **Read-only sharing**: dataset and schema are immutable after
//!   construction; requests run concurrently without locking
//! - **Canonical selections**: filters resolve to bounds-checked,
//!   deduplicated, ascending index sets before any data is touched
//! - **Deterministic bytes**: the same logical input always encodes to
//!   byte-identical output
//! - **Exact missing values**: NaN bit patterns and categorical missing
//!   codes survive the encode/decode round trip

// Re-export core format definitions
pub use amx_core::{
    // Format definitions
    ColumnDescriptor, ElementType, FrameHeader,
    // Error handling
    FrameError,
    // Validation utilities
    validation::{checked_block_len, validate_index, validate_range},
};

// Implementation modules
pub mod adaptor;
pub mod column;
pub mod dataset;
pub mod decode;
pub mod encode;
pub mod error;
pub mod filter;
pub mod matrix;
pub mod schema;
pub mod view;

// Public exports
pub use adaptor::{Axis, MatrixAdaptor};
pub use column::{AnnotationTable, Column};
pub use dataset::Dataset;
pub use decode::{decode_frame, DataFrame, DecodedColumn, DecodedValues};
pub use encode::{encode_annotation_frame, encode_matrix_frame};
pub use error::{AdaptorError, Result};
pub use filter::{AxisFilter, DataFilter, IndexSpec, Selection, ValueFilter};
pub use matrix::{CsrMatrix, DenseMatrix, MatrixData};
pub use schema::{AnnotationColumn, AxisSchema, ColumnType, Schema, SchemaConfig};
pub use view::MatrixView;
