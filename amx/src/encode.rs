//! Binary frame encoding
//!
//! Serializes an annotation table or a filtered matrix view into the AMX
//! columnar wire format. Each column picks the most compact element type
//! its values allow; categorical and free-form string columns become code
//! blocks plus a trailing string dictionary. Column blocks are encoded in
//! parallel but always assembled in declared column order, so the same
//! logical input produces byte-identical output.

use amx_core::{ColumnDescriptor, ElementType, FrameHeader};
use hashbrown::{HashMap, HashSet};
use rayon::prelude::*;

use crate::column::{AnnotationTable, Column};
use crate::error::{AdaptorError, Result};
use crate::schema::{AnnotationColumn, AxisSchema, ColumnType};
use crate::view::MatrixView;

/// Largest f64 magnitude that still represents integers exactly (2^53)
const MAX_SAFE_INT: f64 = 9_007_199_254_740_992.0;

/// One encoded column block awaiting assembly
struct EncodedColumn {
    descriptor: ColumnDescriptor,
    block: Vec<u8>,
    dictionary: Option<Vec<String>>,
}

/// Encode a whole annotation table for one axis
///
/// Columns are encoded in the schema's declared order using the schema's
/// cached classification (categorical domains are reused, not re-derived).
pub fn encode_annotation_frame(table: &AnnotationTable, axis: &AxisSchema) -> Result<Vec<u8>> {
    let pairs: Vec<(&AnnotationColumn, &Column)> = axis
        .columns
        .iter()
        .map(|sc| table.get_column(&sc.name).map(|c| (sc, c)))
        .collect::<Result<_>>()?;

    let encoded = pairs
        .par_iter()
        .map(|&(sc, column)| encode_column(sc, column))
        .collect::<Result<Vec<_>>>()?;

    Ok(assemble(table.len() as u32, encoded))
}

/// Encode a filtered matrix view, one block per selected matrix column
///
/// `names` labels the selected columns and must match the view's column
/// count; order follows the view's (ascending) column selection.
pub fn encode_matrix_frame(view: &MatrixView<'_>, names: &[String]) -> Result<Vec<u8>> {
    let cols = view.col_indices();
    if names.len() != cols.len() {
        return Err(AdaptorError::Dataset(format!(
            "{} column labels supplied for {} selected columns",
            names.len(),
            cols.len()
        )));
    }

    let encoded: Vec<EncodedColumn> = cols
        .par_iter()
        .zip(names.par_iter())
        .map(|(&col, name)| encode_float_column(name, &view.gather_column(col)))
        .collect();

    Ok(assemble(view.row_count() as u32, encoded))
}

/// Encode one annotation column according to its schema classification
fn encode_column(schema_col: &AnnotationColumn, column: &Column) -> Result<EncodedColumn> {
    match (schema_col.value_type, column) {
        (ColumnType::Float, Column::Float(values)) => {
            Ok(encode_float_column(&schema_col.name, values))
        }
        (ColumnType::Int, Column::Int(values)) => {
            Ok(encode_int_column(&schema_col.name, values))
        }
        (ColumnType::Bool, Column::Bool(values)) => {
            let block = values.iter().map(|&v| v as u8).collect();
            Ok(EncodedColumn {
                descriptor: ColumnDescriptor::new(&schema_col.name, ElementType::Bool),
                block,
                dictionary: None,
            })
        }
        (ColumnType::Categorical, Column::Str(values)) => {
            let categories = schema_col.categories.as_deref().ok_or_else(|| {
                AdaptorError::Dataset(format!(
                    "categorical column '{}' has no category domain",
                    schema_col.name
                ))
            })?;
            encode_categorical_column(&schema_col.name, values, categories)
        }
        (ColumnType::String, Column::Str(values)) => {
            // free-form strings still ship as codes; the dictionary is
            // built per encode in first-seen order
            let dictionary = first_seen_domain(values);
            encode_categorical_column(&schema_col.name, values, &dictionary)
        }
        _ => Err(AdaptorError::Dataset(format!(
            "column '{}' is {} but schema says {:?}",
            schema_col.name,
            column.type_name(),
            schema_col.value_type
        ))),
    }
}

/// Encode a float column: f64 when any value needs it, else the smallest
/// integer representation covering the observed range
///
/// NaN (any bit pattern) forces f64 and survives bit-for-bit.
fn encode_float_column(name: &str, values: &[f64]) -> EncodedColumn {
    let needs_float = values.iter().any(|v| {
        !v.is_finite()
            || v.fract() != 0.0
            || v.abs() > MAX_SAFE_INT
            || (*v == 0.0 && v.is_sign_negative())
    });

    if needs_float {
        let mut block = Vec::with_capacity(values.len() * 8);
        for v in values {
            block.extend_from_slice(&v.to_le_bytes());
        }
        return EncodedColumn {
            descriptor: ColumnDescriptor::new(name, ElementType::F64),
            block,
            dictionary: None,
        };
    }

    let as_int: Vec<i64> = values.iter().map(|&v| v as i64).collect();
    encode_int_column(name, &as_int)
}

/// Encode an integer column with the smallest covering element type
fn encode_int_column(name: &str, values: &[i64]) -> EncodedColumn {
    let min = values.iter().copied().min().unwrap_or(0);
    let max = values.iter().copied().max().unwrap_or(0);
    let element_type = int_type_for(min, max);

    let mut block = Vec::with_capacity(values.len() * element_type.size_bytes());
    for &v in values {
        push_int(&mut block, v, element_type);
    }

    EncodedColumn {
        descriptor: ColumnDescriptor::new(name, element_type),
        block,
        dictionary: None,
    }
}

/// Encode string values as dictionary codes
///
/// Missing entries take the reserved code `categories.len()`, which is
/// never a valid dictionary position.
fn encode_categorical_column(
    name: &str,
    values: &[Option<String>],
    categories: &[String],
) -> Result<EncodedColumn> {
    let element_type = ElementType::categorical_for(categories.len());
    let code_of: HashMap<&str, u32> = categories
        .iter()
        .enumerate()
        .map(|(i, c)| (c.as_str(), i as u32))
        .collect();
    let missing_code = categories.len() as u32;

    let mut block = Vec::with_capacity(values.len() * element_type.size_bytes());
    for value in values {
        let code = match value {
            Some(v) => *code_of.get(v.as_str()).ok_or_else(|| {
                AdaptorError::Dataset(format!(
                    "value '{v}' not in the category domain of column '{name}'"
                ))
            })?,
            None => missing_code,
        };
        push_code(&mut block, code, element_type);
    }

    Ok(EncodedColumn {
        descriptor: ColumnDescriptor::new(name, element_type),
        block,
        dictionary: Some(categories.to_vec()),
    })
}

/// Distinct present values in first-seen order
fn first_seen_domain(values: &[Option<String>]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut domain = Vec::new();
    for value in values.iter().flatten() {
        if seen.insert(value.as_str()) {
            domain.push(value.clone());
        }
    }
    domain
}

/// Smallest integer element type covering `[min, max]`
///
/// Unsigned widths are preferred once the range is non-negative.
fn int_type_for(min: i64, max: i64) -> ElementType {
    if min >= 0 {
        if max <= u8::MAX as i64 {
            ElementType::U8
        } else if max <= u16::MAX as i64 {
            ElementType::U16
        } else if max <= u32::MAX as i64 {
            ElementType::U32
        } else {
            ElementType::I64
        }
    } else if min >= i8::MIN as i64 && max <= i8::MAX as i64 {
        ElementType::I8
    } else if min >= i16::MIN as i64 && max <= i16::MAX as i64 {
        ElementType::I16
    } else if min >= i32::MIN as i64 && max <= i32::MAX as i64 {
        ElementType::I32
    } else {
        ElementType::I64
    }
}

fn push_int(block: &mut Vec<u8>, v: i64, element_type: ElementType) {
    match element_type {
        ElementType::I8 => block.extend_from_slice(&(v as i8).to_le_bytes()),
        ElementType::I16 => block.extend_from_slice(&(v as i16).to_le_bytes()),
        ElementType::I32 => block.extend_from_slice(&(v as i32).to_le_bytes()),
        ElementType::I64 => block.extend_from_slice(&v.to_le_bytes()),
        ElementType::U8 => block.extend_from_slice(&(v as u8).to_le_bytes()),
        ElementType::U16 => block.extend_from_slice(&(v as u16).to_le_bytes()),
        ElementType::U32 => block.extend_from_slice(&(v as u32).to_le_bytes()),
        _ => unreachable!("integer block with non-integer element type"),
    }
}

fn push_code(block: &mut Vec<u8>, code: u32, element_type: ElementType) {
    match element_type {
        ElementType::Cat8 => block.push(code as u8),
        ElementType::Cat16 => block.extend_from_slice(&(code as u16).to_le_bytes()),
        ElementType::Cat32 => block.extend_from_slice(&code.to_le_bytes()),
        _ => unreachable!("code block with non-categorical element type"),
    }
}

/// Assemble header, descriptor table, column blocks and dictionaries
///
/// Layout and ordering are fully determined by the input column order.
fn assemble(row_count: u32, columns: Vec<EncodedColumn>) -> Vec<u8> {
    let column_count = columns.len() as u32;
    let header = FrameHeader::new(row_count, column_count, column_count);

    let descriptor_len: usize = columns.iter().map(|c| c.descriptor.encoded_len()).sum();
    let body_len: usize = columns.iter().map(|c| c.block.len()).sum();
    let dict_len: usize = columns
        .iter()
        .filter_map(|c| c.dictionary.as_ref())
        .map(|d| 4 + d.iter().map(|s| 4 + s.len()).sum::<usize>())
        .sum();

    let mut out =
        Vec::with_capacity(FrameHeader::SIZE + descriptor_len + body_len + dict_len);
    out.extend_from_slice(&header.to_bytes());
    for column in &columns {
        column.descriptor.write_into(&mut out);
    }
    for column in &columns {
        out.extend_from_slice(&column.block);
    }
    for column in &columns {
        if let Some(dictionary) = &column.dictionary {
            out.extend_from_slice(&(dictionary.len() as u32).to_le_bytes());
            for category in dictionary {
                out.extend_from_slice(&(category.len() as u32).to_le_bytes());
                out.extend_from_slice(category.as_bytes());
            }
        }
    }
    out
}
