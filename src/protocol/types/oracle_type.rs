//! Bind and column type codes.
//!
//! A `TypeCode` is the closed set of types the marshaling layer understands.
//! Each maps to an Oracle wire type number and carries a default maximum length.

use crate::error::{Error, Result};
use crate::protocol::constants::{
    ORA_TYPE_NUM_CHAR, ORA_TYPE_NUM_LONG, ORA_TYPE_NUM_NUMBER, ORA_TYPE_NUM_RAW,
    ORA_TYPE_NUM_ROWID, ORA_TYPE_NUM_UROWID, ORA_TYPE_NUM_VARCHAR, TNS_MAX_CHAR_LENGTH,
    TNS_MAX_LONG_LENGTH, TNS_MAX_NUMBER_LENGTH, TNS_MAX_ROWID_LENGTH, TNS_MAX_SHORT_LENGTH,
};

/// Type code of a bind variable or result column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCode {
    /// NUMBER - Oracle decimal number.
    Number,
    /// VARCHAR2 - variable-length string.
    String,
    /// RAW - variable-length binary.
    Binary,
    /// CHAR - blank-padded fixed-width string.
    FixedChar,
    /// ROWID / UROWID in its text form.
    Rowid,
    /// LONG - string too large for VARCHAR2.
    LongString,
}

impl TypeCode {
    /// Create from a raw Oracle wire type number.
    ///
    /// Returns `Err(Error::UnsupportedType)` for types outside the closed set.
    pub fn from_type_num(type_num: u16) -> Result<Self> {
        match type_num {
            ORA_TYPE_NUM_NUMBER => Ok(TypeCode::Number),
            ORA_TYPE_NUM_VARCHAR => Ok(TypeCode::String),
            ORA_TYPE_NUM_RAW => Ok(TypeCode::Binary),
            ORA_TYPE_NUM_CHAR => Ok(TypeCode::FixedChar),
            ORA_TYPE_NUM_ROWID | ORA_TYPE_NUM_UROWID => Ok(TypeCode::Rowid),
            ORA_TYPE_NUM_LONG => Ok(TypeCode::LongString),
            _ => Err(Error::UnsupportedType { type_num }),
        }
    }

    /// Get the Oracle wire type number.
    pub fn type_num(&self) -> u16 {
        match self {
            TypeCode::Number => ORA_TYPE_NUM_NUMBER,
            TypeCode::String => ORA_TYPE_NUM_VARCHAR,
            TypeCode::Binary => ORA_TYPE_NUM_RAW,
            TypeCode::FixedChar => ORA_TYPE_NUM_CHAR,
            TypeCode::Rowid => ORA_TYPE_NUM_ROWID,
            TypeCode::LongString => ORA_TYPE_NUM_LONG,
        }
    }

    /// Maximum length used when a variable is created without an explicit size.
    pub fn default_max_length(&self) -> u32 {
        match self {
            TypeCode::Number => TNS_MAX_NUMBER_LENGTH,
            TypeCode::String | TypeCode::Binary => TNS_MAX_SHORT_LENGTH,
            TypeCode::FixedChar => TNS_MAX_CHAR_LENGTH,
            TypeCode::Rowid => TNS_MAX_ROWID_LENGTH,
            TypeCode::LongString => TNS_MAX_LONG_LENGTH,
        }
    }

    /// Whether values of this type are character data.
    pub fn is_character(&self) -> bool {
        matches!(
            self,
            TypeCode::String | TypeCode::FixedChar | TypeCode::Rowid | TypeCode::LongString
        )
    }
}

impl std::fmt::Display for TypeCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeCode::Number => write!(f, "NUMBER"),
            TypeCode::String => write!(f, "STRING"),
            TypeCode::Binary => write!(f, "BINARY"),
            TypeCode::FixedChar => write!(f, "FIXED_CHAR"),
            TypeCode::Rowid => write!(f, "ROWID"),
            TypeCode::LongString => write!(f, "LONG_STRING"),
        }
    }
}
