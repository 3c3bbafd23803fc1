//! Binary frame decoding
//!
//! Reconstructs a dataframe from AMX frame bytes: counts, column name
//! order, exact NaN bit patterns for float columns and the reserved
//! missing code for categorical columns all survive the round trip.

use amx_core::format::constants::MAX_CATEGORY_LEN;
use amx_core::validation::checked_block_len;
use amx_core::{ColumnDescriptor, ElementType, FrameError, FrameHeader};

use crate::error::Result;

/// A decoded frame: logical shape plus columns in declared order
#[derive(Debug, Clone, PartialEq)]
pub struct DataFrame {
    /// Number of rows
    pub row_count: usize,
    /// Logical width of the frame
    pub col_count: usize,
    /// Columns in declared order
    pub columns: Vec<DecodedColumn>,
}

impl DataFrame {
    /// Column names in declared order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&DecodedColumn> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// One decoded column
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedColumn {
    /// Column name
    pub name: String,
    /// Element type tag the column was encoded with
    pub element_type: ElementType,
    /// Decoded values
    pub values: DecodedValues,
}

impl DecodedColumn {
    /// Category string at `row`, None for missing entries or
    /// non-categorical columns
    pub fn category_of(&self, row: usize) -> Option<&str> {
        match &self.values {
            DecodedValues::Categorical { codes, categories } => {
                let code = *codes.get(row)? as usize;
                categories.get(code).map(String::as_str)
            }
            _ => None,
        }
    }
}

/// Decoded column values, integer widths widened to i64
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedValues {
    /// Float values, NaN bit patterns intact
    F64(Vec<f64>),
    /// Integer values of any encoded width
    I64(Vec<i64>),
    /// Boolean values
    Bool(Vec<bool>),
    /// Categorical codes plus their dictionary; the code
    /// `categories.len()` marks a missing entry
    Categorical {
        /// Per-row dictionary codes
        codes: Vec<u32>,
        /// Dictionary in encoded order
        categories: Vec<String>,
    },
}

impl DecodedValues {
    /// Float values, if this is a float column
    pub fn as_f64(&self) -> Option<&[f64]> {
        match self {
            DecodedValues::F64(v) => Some(v),
            _ => None,
        }
    }

    /// Integer values, if this is an integer column
    pub fn as_i64(&self) -> Option<&[i64]> {
        match self {
            DecodedValues::I64(v) => Some(v),
            _ => None,
        }
    }
}

enum RawBlock {
    F64(Vec<f64>),
    I64(Vec<i64>),
    Bool(Vec<bool>),
    Codes(Vec<u32>),
}

/// Decode a complete AMX frame
pub fn decode_frame(bytes: &[u8]) -> Result<DataFrame> {
    let header = FrameHeader::from_bytes(bytes)?;
    let rows = header.row_count as usize;

    let mut offset = FrameHeader::SIZE;
    let mut descriptors = Vec::with_capacity(header.column_count as usize);
    for _ in 0..header.column_count {
        let (descriptor, used) = ColumnDescriptor::from_bytes(&bytes[offset..])?;
        offset += used;
        descriptors.push(descriptor);
    }

    let mut blocks = Vec::with_capacity(descriptors.len());
    for descriptor in &descriptors {
        let len = checked_block_len(descriptor.element_type.size_bytes(), rows)?;
        let end = offset + len;
        if bytes.len() < end {
            return Err(FrameError::InsufficientBuffer.into());
        }
        blocks.push(decode_block(descriptor.element_type, &bytes[offset..end]));
        offset = end;
    }
    let blocks = blocks.into_iter().collect::<core::result::Result<Vec<_>, _>>()?;

    let mut columns = Vec::with_capacity(descriptors.len());
    for (descriptor, block) in descriptors.into_iter().zip(blocks) {
        let values = match block {
            RawBlock::Codes(codes) => {
                let (categories, used) = read_dictionary(&bytes[offset..])?;
                offset += used;
                // a code may be at most the reserved missing sentinel
                if codes.iter().any(|&c| c as usize > categories.len()) {
                    return Err(FrameError::CorruptedData.into());
                }
                DecodedValues::Categorical { codes, categories }
            }
            RawBlock::F64(v) => DecodedValues::F64(v),
            RawBlock::I64(v) => DecodedValues::I64(v),
            RawBlock::Bool(v) => DecodedValues::Bool(v),
        };
        columns.push(DecodedColumn {
            name: descriptor.name,
            element_type: descriptor.element_type,
            values,
        });
    }

    if offset != bytes.len() {
        return Err(FrameError::CorruptedData.into());
    }

    Ok(DataFrame {
        row_count: rows,
        col_count: header.col_count as usize,
        columns,
    })
}

fn decode_block(element_type: ElementType, block: &[u8]) -> core::result::Result<RawBlock, FrameError> {
    let raw = match element_type {
        ElementType::F64 => RawBlock::F64(
            block
                .chunks_exact(8)
                .map(|c| {
                    f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]])
                })
                .collect(),
        ),
        ElementType::I8 => RawBlock::I64(block.iter().map(|&b| b as i8 as i64).collect()),
        ElementType::I16 => RawBlock::I64(
            block
                .chunks_exact(2)
                .map(|c| i16::from_le_bytes([c[0], c[1]]) as i64)
                .collect(),
        ),
        ElementType::I32 => RawBlock::I64(
            block
                .chunks_exact(4)
                .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]) as i64)
                .collect(),
        ),
        ElementType::I64 => RawBlock::I64(
            block
                .chunks_exact(8)
                .map(|c| {
                    i64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]])
                })
                .collect(),
        ),
        ElementType::U8 => RawBlock::I64(block.iter().map(|&b| b as i64).collect()),
        ElementType::U16 => RawBlock::I64(
            block
                .chunks_exact(2)
                .map(|c| u16::from_le_bytes([c[0], c[1]]) as i64)
                .collect(),
        ),
        ElementType::U32 => RawBlock::I64(
            block
                .chunks_exact(4)
                .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]) as i64)
                .collect(),
        ),
        ElementType::Bool => {
            let mut values = Vec::with_capacity(block.len());
            for &b in block {
                match b {
                    0 => values.push(false),
                    1 => values.push(true),
                    _ => return Err(FrameError::CorruptedData),
                }
            }
            RawBlock::Bool(values)
        }
        ElementType::Cat8 => RawBlock::Codes(block.iter().map(|&b| b as u32).collect()),
        ElementType::Cat16 => RawBlock::Codes(
            block
                .chunks_exact(2)
                .map(|c| u16::from_le_bytes([c[0], c[1]]) as u32)
                .collect(),
        ),
        ElementType::Cat32 => RawBlock::Codes(
            block
                .chunks_exact(4)
                .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        ),
    };
    Ok(raw)
}

/// Read one dictionary block, returning the categories and bytes consumed
fn read_dictionary(bytes: &[u8]) -> core::result::Result<(Vec<String>, usize), FrameError> {
    if bytes.len() < 4 {
        return Err(FrameError::InsufficientBuffer);
    }
    let count = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;

    let mut offset = 4;
    let mut categories = Vec::with_capacity(count.min(4096));
    for _ in 0..count {
        if bytes.len() < offset + 4 {
            return Err(FrameError::InsufficientBuffer);
        }
        let len = u32::from_le_bytes([
            bytes[offset],
            bytes[offset + 1],
            bytes[offset + 2],
            bytes[offset + 3],
        ]) as usize;
        if len > MAX_CATEGORY_LEN {
            return Err(FrameError::CorruptedData);
        }
        offset += 4;
        if bytes.len() < offset + len {
            return Err(FrameError::InsufficientBuffer);
        }
        let category = core::str::from_utf8(&bytes[offset..offset + len])
            .map_err(|_| FrameError::CorruptedData)?
            .to_string();
        categories.push(category);
        offset += len;
    }

    Ok((categories, offset))
}
