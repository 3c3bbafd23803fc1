//! Error types for AMX frame operations

/// Errors that can occur while building or parsing AMX frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Buffer too small for the structure being read
    InsufficientBuffer,
    /// Invalid frame header
    InvalidHeader,
    /// Frame version newer than this implementation supports
    UnsupportedVersion,
    /// Malformed column descriptor
    InvalidDescriptor,
    /// Element type tag not defined by the format
    UnknownTypeTag(u8),
    /// Frame contents inconsistent with its header
    CorruptedData,
    /// Index outside the axis extent
    IndexOutOfBounds,
    /// Range with start >= stop, or bounds outside the axis extent
    InvalidRange,
}

impl core::fmt::Display for FrameError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FrameError::InsufficientBuffer => write!(f, "Insufficient buffer for AMX frame"),
            FrameError::InvalidHeader => write!(f, "Invalid AMX frame header"),
            FrameError::UnsupportedVersion => write!(f, "Unsupported AMX frame version"),
            FrameError::InvalidDescriptor => write!(f, "Malformed column descriptor"),
            FrameError::UnknownTypeTag(tag) => write!(f, "Unknown element type tag {tag}"),
            FrameError::CorruptedData => write!(f, "Frame data inconsistent with header"),
            FrameError::IndexOutOfBounds => write!(f, "Index out of bounds"),
            FrameError::InvalidRange => write!(f, "Invalid index range"),
        }
    }
}

impl std::error::Error for FrameError {}

/// Result type for AMX frame operations
pub type Result<T> = core::result::Result<T, FrameError>;
