//! Binary frame format definitions for the AMX wire specification
//!
//! This module contains pure data structure definitions for the AMX frame.
//! No I/O operations or concrete implementations - only format layouts.

pub mod column;
pub mod constants;
pub mod header;

pub use column::{ColumnDescriptor, ElementType};
pub use header::FrameHeader;
