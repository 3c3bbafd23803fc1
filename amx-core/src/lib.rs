//! AMX Core - Binary Annotated Matrix Frame Definitions
//!
//! This crate provides the core format definitions and validation for the
//! AMX binary columnar frame: the wire representation used to ship filtered
//! matrix slices and annotation tables to clients.
//!
//! All multi-byte fields are little-endian. No I/O happens here; the crate
//! only defines layouts and pure validation helpers.

pub mod error;
pub mod format;
pub mod validation;

pub use error::*;
pub use format::*;
pub use validation::*;
