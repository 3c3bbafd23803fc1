//! Column descriptors and element type tags for AMX frames
//!
//! Each column block in a frame is described by a name and an element type
//! tag. Categorical tags carry their code width; the string dictionary for
//! a categorical column lives in the frame's trailing dictionary section.

use super::constants::MAX_NAME_LEN;
use crate::{FrameError, Result};

/// Binary element types supported by AMX column blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ElementType {
    /// 64-bit floating point, NaN bit patterns preserved
    F64 = 0,
    /// 8-bit signed integer
    I8 = 1,
    /// 16-bit signed integer
    I16 = 2,
    /// 32-bit signed integer
    I32 = 3,
    /// 64-bit signed integer
    I64 = 4,
    /// 8-bit unsigned integer
    U8 = 5,
    /// 16-bit unsigned integer
    U16 = 6,
    /// 32-bit unsigned integer
    U32 = 7,
    /// Boolean, one byte per value (0 or 1)
    Bool = 8,
    /// Categorical code, 8-bit width
    Cat8 = 9,
    /// Categorical code, 16-bit width
    Cat16 = 10,
    /// Categorical code, 32-bit width
    Cat32 = 11,
}

impl ElementType {
    /// Convert from u8 representation
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ElementType::F64),
            1 => Some(ElementType::I8),
            2 => Some(ElementType::I16),
            3 => Some(ElementType::I32),
            4 => Some(ElementType::I64),
            5 => Some(ElementType::U8),
            6 => Some(ElementType::U16),
            7 => Some(ElementType::U32),
            8 => Some(ElementType::Bool),
            9 => Some(ElementType::Cat8),
            10 => Some(ElementType::Cat16),
            11 => Some(ElementType::Cat32),
            _ => None,
        }
    }

    /// Convert to u8 representation
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Get the size in bytes of one element
    pub const fn size_bytes(self) -> usize {
        match self {
            ElementType::I8 | ElementType::U8 | ElementType::Bool | ElementType::Cat8 => 1,
            ElementType::I16 | ElementType::U16 | ElementType::Cat16 => 2,
            ElementType::I32 | ElementType::U32 | ElementType::Cat32 => 4,
            ElementType::F64 | ElementType::I64 => 8,
        }
    }

    /// Whether this tag is a categorical code requiring a dictionary block
    pub const fn is_categorical(self) -> bool {
        matches!(self, ElementType::Cat8 | ElementType::Cat16 | ElementType::Cat32)
    }

    /// Smallest categorical code width covering `category_count` categories
    /// plus the reserved not-in-dictionary code
    pub const fn categorical_for(category_count: usize) -> Self {
        // the reserved missing code equals category_count, so the code
        // space must hold category_count + 1 values
        if category_count < u8::MAX as usize {
            ElementType::Cat8
        } else if category_count < u16::MAX as usize {
            ElementType::Cat16
        } else {
            ElementType::Cat32
        }
    }
}

impl core::fmt::Display for ElementType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ElementType::F64 => write!(f, "f64"),
            ElementType::I8 => write!(f, "i8"),
            ElementType::I16 => write!(f, "i16"),
            ElementType::I32 => write!(f, "i32"),
            ElementType::I64 => write!(f, "i64"),
            ElementType::U8 => write!(f, "u8"),
            ElementType::U16 => write!(f, "u16"),
            ElementType::U32 => write!(f, "u32"),
            ElementType::Bool => write!(f, "bool"),
            ElementType::Cat8 => write!(f, "cat8"),
            ElementType::Cat16 => write!(f, "cat16"),
            ElementType::Cat32 => write!(f, "cat32"),
        }
    }
}

/// Descriptor for one column block: name plus element type tag
///
/// Wire layout: `name_len: u32`, `name: [u8; name_len]` (UTF-8),
/// `element_type: u8`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnDescriptor {
    /// Column name, UTF-8
    pub name: String,
    /// Element type of the column's data block
    pub element_type: ElementType,
}

impl ColumnDescriptor {
    /// Create a new descriptor
    pub fn new(name: impl Into<String>, element_type: ElementType) -> Self {
        Self {
            name: name.into(),
            element_type,
        }
    }

    /// Encoded size of this descriptor in bytes
    pub fn encoded_len(&self) -> usize {
        4 + self.name.len() + 1
    }

    /// Append the wire encoding of this descriptor to `out`
    pub fn write_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&(self.name.len() as u32).to_le_bytes());
        out.extend_from_slice(self.name.as_bytes());
        out.push(self.element_type.to_u8());
    }

    /// Parse a descriptor from bytes, returning it and the bytes consumed
    pub fn from_bytes(bytes: &[u8]) -> Result<(Self, usize)> {
        if bytes.len() < 4 {
            return Err(FrameError::InsufficientBuffer);
        }

        let name_len = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
        if name_len > MAX_NAME_LEN {
            return Err(FrameError::InvalidDescriptor);
        }

        let end = 4usize
            .checked_add(name_len)
            .and_then(|n| n.checked_add(1))
            .ok_or(FrameError::InvalidDescriptor)?;
        if bytes.len() < end {
            return Err(FrameError::InsufficientBuffer);
        }

        let name = core::str::from_utf8(&bytes[4..4 + name_len])
            .map_err(|_| FrameError::InvalidDescriptor)?
            .to_string();
        let tag = bytes[4 + name_len];
        let element_type = ElementType::from_u8(tag).ok_or(FrameError::UnknownTypeTag(tag))?;

        Ok((Self { name, element_type }, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_type_roundtrip() {
        for tag in 0u8..12 {
            let ty = ElementType::from_u8(tag).unwrap();
            assert_eq!(ty.to_u8(), tag);
        }
        assert_eq!(ElementType::from_u8(12), None);
        assert_eq!(ElementType::from_u8(255), None);
    }

    #[test]
    fn test_element_type_sizes() {
        assert_eq!(ElementType::F64.size_bytes(), 8);
        assert_eq!(ElementType::I64.size_bytes(), 8);
        assert_eq!(ElementType::I32.size_bytes(), 4);
        assert_eq!(ElementType::U16.size_bytes(), 2);
        assert_eq!(ElementType::Bool.size_bytes(), 1);
        assert_eq!(ElementType::Cat8.size_bytes(), 1);
        assert_eq!(ElementType::Cat32.size_bytes(), 4);
    }

    #[test]
    fn test_categorical_width_selection() {
        assert_eq!(ElementType::categorical_for(0), ElementType::Cat8);
        assert_eq!(ElementType::categorical_for(254), ElementType::Cat8);
        assert_eq!(ElementType::categorical_for(255), ElementType::Cat16);
        assert_eq!(ElementType::categorical_for(65534), ElementType::Cat16);
        assert_eq!(ElementType::categorical_for(65535), ElementType::Cat32);
    }

    #[test]
    fn test_descriptor_roundtrip() {
        let desc = ColumnDescriptor::new("percent_mito", ElementType::F64);
        let mut buf = Vec::new();
        desc.write_into(&mut buf);
        assert_eq!(buf.len(), desc.encoded_len());

        let (parsed, consumed) = ColumnDescriptor::from_bytes(&buf).unwrap();
        assert_eq!(parsed, desc);
        assert_eq!(consumed, buf.len());
    }

    #[test]
    fn test_descriptor_rejects_unknown_tag() {
        let desc = ColumnDescriptor::new("x", ElementType::Bool);
        let mut buf = Vec::new();
        desc.write_into(&mut buf);
        let last = buf.len() - 1;
        buf[last] = 99;
        assert_eq!(
            ColumnDescriptor::from_bytes(&buf),
            Err(FrameError::UnknownTypeTag(99))
        );
    }

    #[test]
    fn test_descriptor_rejects_truncated_buffer() {
        let desc = ColumnDescriptor::new("louvain", ElementType::Cat8);
        let mut buf = Vec::new();
        desc.write_into(&mut buf);
        assert_eq!(
            ColumnDescriptor::from_bytes(&buf[..buf.len() - 2]),
            Err(FrameError::InsufficientBuffer)
        );
    }
}
