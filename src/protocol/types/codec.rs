//! Column description and row decoding.

use bytes::Bytes;
use std::sync::Arc;

use super::column::{ColumnDescriptor, ColumnInfo};
use super::metadata::ColumnMetadata;
use super::oracle_type::TypeCode;
use super::row::Row;
use super::value::OracleValue;
use crate::config::NumberPolicy;
use crate::error::{Error, Result};
use crate::protocol::constants::{
    ORA_TYPE_NUM_UROWID, TNS_MAX_BYTES_PER_CHAR, TNS_MAX_ROWID_LENGTH, TNS_MAX_UROWID_LENGTH,
    TNS_NUMBER_DEFAULT_DISPLAY_SIZE,
};

/// Decodes describe metadata and raw fetched column values.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowCodec {
    policy: NumberPolicy,
}

impl RowCodec {
    /// Create a codec applying the given NUMBER narrowing policy.
    pub fn new(policy: NumberPolicy) -> Self {
        Self { policy }
    }

    /// Build column descriptors from transport metadata.
    ///
    /// Returns `Err(Error::UnsupportedType)` if any column has a type outside
    /// the supported set.
    pub fn describe(&self, metadata: &[ColumnMetadata]) -> Result<Vec<ColumnDescriptor>> {
        metadata.iter().map(describe_column).collect()
    }

    /// Decode one fetched row.
    ///
    /// Values map positionally onto the columns. FIXED_CHAR data keeps its
    /// blank padding.
    pub fn decode_row(&self, raw: &[Option<Bytes>], column_info: &Arc<ColumnInfo>) -> Result<Row> {
        if raw.len() != column_info.len() {
            return Err(Error::IndexOutOfRange {
                index: raw.len(),
                len: column_info.len(),
            });
        }

        let values = raw
            .iter()
            .zip(&column_info.columns)
            .map(|(data, col)| OracleValue::from_wire(col.type_code, data.as_deref(), self.policy))
            .collect::<Result<Vec<_>>>()?;

        Ok(Row::new(values, Arc::clone(column_info)))
    }
}

fn describe_column(meta: &ColumnMetadata) -> Result<ColumnDescriptor> {
    let type_code = TypeCode::from_type_num(meta.oracle_type)?;

    let (display_size, internal_size, precision, scale) = match type_code {
        TypeCode::Number => {
            let display = if meta.precision > 0 {
                meta.precision as u32 + 1 + u32::from(meta.scale > 0)
            } else {
                TNS_NUMBER_DEFAULT_DISPLAY_SIZE
            };
            (Some(display), None, Some(meta.precision), Some(meta.scale))
        }
        TypeCode::String | TypeCode::FixedChar | TypeCode::LongString => {
            let chars = if meta.char_size > 0 {
                meta.char_size
            } else {
                meta.max_size / TNS_MAX_BYTES_PER_CHAR
            };
            (Some(chars), Some(meta.max_size), None, None)
        }
        TypeCode::Binary => (Some(meta.max_size), Some(meta.max_size), None, None),
        TypeCode::Rowid => {
            let size = match meta.max_size {
                0 if meta.oracle_type == ORA_TYPE_NUM_UROWID => TNS_MAX_UROWID_LENGTH,
                0 => TNS_MAX_ROWID_LENGTH,
                size => size,
            };
            (Some(size), Some(size), None, None)
        }
    };

    Ok(ColumnDescriptor {
        name: meta.name.clone(),
        type_code,
        display_size,
        internal_size,
        precision,
        scale,
        nullable: meta.nullable,
    })
}
