//! Pure validation utilities for the AMX frame specification
//!
//! No I/O dependencies - only mathematical checks used by frame builders
//! and by callers resolving client-supplied selections.

pub mod bounds;

pub use bounds::*;
