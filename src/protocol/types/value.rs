//! Host values and their wire encoding.

use bytes::Bytes;
use std::fmt;

use super::oracle_type::TypeCode;
use crate::config::NumberPolicy;
use crate::error::{Error, Result};
use crate::protocol::decode::{decode_oracle_number, encode_oracle_number};

/// Oracle value enum representing a single bind element or column value.
#[derive(Debug, Clone, PartialEq)]
pub enum OracleValue {
    /// NULL value.
    Null,
    /// String value (VARCHAR2, CHAR, LONG).
    String(String),
    /// Integral NUMBER that fits in an i64.
    Integer(i64),
    /// NUMBER whose decimal text round-trips through an f64.
    ///
    /// NUMBER keeps no float marker, so an integral float such as `1.0` is
    /// stored as `1` and reads back as `Integer(1)`.
    Float(f64),
    /// NUMBER kept as exact decimal text.
    Number(String),
    /// Raw binary value (RAW type).
    Raw(Vec<u8>),
    /// ROWID in its text form.
    Rowid(String),
}

impl OracleValue {
    /// Check if the value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, OracleValue::Null)
    }

    /// Try to get the value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OracleValue::String(s) | OracleValue::Number(s) | OracleValue::Rowid(s) => Some(s),
            _ => None,
        }
    }

    /// Try to convert to i64.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            OracleValue::Integer(i) => Some(*i),
            OracleValue::Number(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Try to convert to f64.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            OracleValue::Integer(i) => Some(*i as f64),
            OracleValue::Float(f) => Some(*f),
            OracleValue::Number(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Try to get the value as raw bytes.
    pub fn as_raw(&self) -> Option<&[u8]> {
        match self {
            OracleValue::Raw(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Short name of the value's shape, used in type mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            OracleValue::Null => "null",
            OracleValue::String(_) => "text",
            OracleValue::Integer(_) => "integer",
            OracleValue::Float(_) => "float",
            OracleValue::Number(_) => "decimal",
            OracleValue::Raw(_) => "bytes",
            OracleValue::Rowid(_) => "rowid",
        }
    }

    /// Type code inferred from the value's shape.
    ///
    /// Returns `None` for NULL, whose type is deferred.
    pub fn inferred_type(&self) -> Option<TypeCode> {
        match self {
            OracleValue::Null => None,
            OracleValue::String(_) => Some(TypeCode::String),
            OracleValue::Integer(_) | OracleValue::Float(_) | OracleValue::Number(_) => {
                Some(TypeCode::Number)
            }
            OracleValue::Raw(_) => Some(TypeCode::Binary),
            OracleValue::Rowid(_) => Some(TypeCode::Rowid),
        }
    }

    /// Encode the value as wire bytes for the given type.
    ///
    /// `None` is the NULL indicator; empty strings and byte strings encode as NULL.
    pub fn to_wire(&self, type_code: TypeCode) -> Result<Option<Bytes>> {
        let bytes = match (type_code, self) {
            (_, OracleValue::Null) => return Ok(None),

            (TypeCode::Number, OracleValue::Integer(i)) => encode_number(&i.to_string())?,
            (TypeCode::Number, OracleValue::Float(f)) if f.is_finite() => {
                encode_number(&f.to_string())?
            }
            (TypeCode::Number, OracleValue::Number(text))
            | (TypeCode::Number, OracleValue::String(text)) => match encode_oracle_number(text)? {
                Some(bytes) => Bytes::from(bytes),
                None => return Err(Error::type_mismatch(type_code, format!("text '{text}'"))),
            },

            (
                TypeCode::String | TypeCode::FixedChar | TypeCode::LongString,
                OracleValue::String(s) | OracleValue::Rowid(s) | OracleValue::Number(s),
            ) => Bytes::copy_from_slice(s.as_bytes()),
            (
                TypeCode::String | TypeCode::FixedChar | TypeCode::LongString,
                OracleValue::Integer(i),
            ) => Bytes::from(i.to_string()),
            (
                TypeCode::String | TypeCode::FixedChar | TypeCode::LongString,
                OracleValue::Float(f),
            ) if f.is_finite() => Bytes::from(f.to_string()),

            (TypeCode::Binary, OracleValue::Raw(bytes)) => Bytes::copy_from_slice(bytes),
            (TypeCode::Binary, OracleValue::String(s)) => Bytes::copy_from_slice(s.as_bytes()),

            (TypeCode::Rowid, OracleValue::Rowid(s) | OracleValue::String(s)) => {
                Bytes::copy_from_slice(s.as_bytes())
            }

            (_, other) => return Err(Error::type_mismatch(type_code, other.kind())),
        };

        Ok((!bytes.is_empty()).then_some(bytes))
    }

    /// Decode wire bytes of the given type.
    ///
    /// `None` and zero-length data decode to NULL for every type.
    pub fn from_wire(type_code: TypeCode, data: Option<&[u8]>, policy: NumberPolicy) -> Result<Self> {
        let bytes = match data {
            Some(bytes) if !bytes.is_empty() => bytes,
            _ => return Ok(OracleValue::Null),
        };

        match type_code {
            TypeCode::String | TypeCode::FixedChar | TypeCode::LongString => {
                Ok(OracleValue::String(utf8(bytes)?))
            }
            TypeCode::Rowid => Ok(OracleValue::Rowid(utf8(bytes)?)),
            TypeCode::Binary => Ok(OracleValue::Raw(bytes.to_vec())),
            TypeCode::Number => narrow_number(decode_oracle_number(bytes)?, policy),
        }
    }
}

fn encode_number(text: &str) -> Result<Bytes> {
    encode_oracle_number(text)?
        .map(Bytes::from)
        .ok_or_else(|| Error::type_conversion(format!("cannot encode '{text}' as NUMBER")))
}

fn utf8(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| Error::type_conversion(format!("invalid UTF-8 in character data: {e}")))
}

/// Pick the narrowest exact representation for NUMBER decimal text.
fn narrow_number(text: String, policy: NumberPolicy) -> Result<OracleValue> {
    if !text.contains('.') {
        if let Ok(i) = text.parse::<i64>() {
            return Ok(OracleValue::Integer(i));
        }
    }
    if let Ok(f) = text.parse::<f64>() {
        if f.is_finite() && f.to_string() == text {
            return Ok(OracleValue::Float(f));
        }
    }
    match policy {
        NumberPolicy::Strict => Err(Error::PrecisionLoss { value: text }),
        NumberPolicy::Text => Ok(OracleValue::Number(text)),
    }
}

impl fmt::Display for OracleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OracleValue::Null => write!(f, "NULL"),
            OracleValue::String(s) | OracleValue::Number(s) | OracleValue::Rowid(s) => {
                write!(f, "{}", s)
            }
            OracleValue::Integer(i) => write!(f, "{}", i),
            OracleValue::Float(v) => write!(f, "{}", v),
            OracleValue::Raw(bytes) => write!(f, "<RAW: {} bytes>", bytes.len()),
        }
    }
}

impl From<&str> for OracleValue {
    fn from(s: &str) -> Self {
        OracleValue::String(s.to_string())
    }
}

impl From<String> for OracleValue {
    fn from(s: String) -> Self {
        OracleValue::String(s)
    }
}

impl From<i64> for OracleValue {
    fn from(i: i64) -> Self {
        OracleValue::Integer(i)
    }
}

impl From<i32> for OracleValue {
    fn from(i: i32) -> Self {
        OracleValue::Integer(i as i64)
    }
}

impl From<f64> for OracleValue {
    fn from(f: f64) -> Self {
        OracleValue::Float(f)
    }
}

impl From<Vec<u8>> for OracleValue {
    fn from(bytes: Vec<u8>) -> Self {
        OracleValue::Raw(bytes)
    }
}

impl From<&[u8]> for OracleValue {
    fn from(bytes: &[u8]) -> Self {
        OracleValue::Raw(bytes.to_vec())
    }
}

impl<T: Into<OracleValue>> From<Option<T>> for OracleValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(OracleValue::Null, Into::into)
    }
}
