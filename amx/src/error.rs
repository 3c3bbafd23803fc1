//! Error types for adaptor operations

use amx_core::FrameError;

/// Errors surfaced by the annotated matrix adaptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdaptorError {
    /// Filter is structurally invalid or references out-of-bounds indices
    /// or unknown columns
    Filter(String),
    /// A referenced annotation column does not exist
    ColumnNotFound(String),
    /// The requested configuration is a fixed, known limitation
    Unsupported(&'static str),
    /// Dataset construction or consistency failure
    Dataset(String),
    /// Wire-level frame failure
    Frame(FrameError),
}

impl core::fmt::Display for AdaptorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AdaptorError::Filter(msg) => write!(f, "Invalid filter: {msg}"),
            AdaptorError::ColumnNotFound(name) => write!(f, "Column not found: {name}"),
            AdaptorError::Unsupported(what) => write!(f, "Unsupported configuration: {what}"),
            AdaptorError::Dataset(msg) => write!(f, "Invalid dataset: {msg}"),
            AdaptorError::Frame(err) => write!(f, "Frame error: {err}"),
        }
    }
}

impl std::error::Error for AdaptorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AdaptorError::Frame(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FrameError> for AdaptorError {
    fn from(err: FrameError) -> Self {
        AdaptorError::Frame(err)
    }
}

/// Result type for adaptor operations
pub type Result<T> = core::result::Result<T, AdaptorError>;
