//! Error types for bind and fetch marshaling.

use thiserror::Error;

use crate::protocol::types::TypeCode;

/// Result type alias for marshaling operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for bind and fetch operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Encoded value does not fit in the variable's declared maximum length.
    #[error("Value too long: encoded length {length} exceeds maximum {max_length}")]
    ValueTooLong { length: usize, max_length: u32 },

    /// Value cannot be bound as the declared type.
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: TypeCode, actual: String },

    /// Numeric value cannot be represented exactly by the target type.
    #[error("Precision loss decoding NUMBER value {value}")]
    PrecisionLoss { value: String },

    /// Bind element or column index beyond the declared bounds.
    #[error("Index {index} out of range (length: {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Unsupported Oracle data type.
    #[error("Unsupported Oracle data type: {type_num}")]
    UnsupportedType { type_num: u16 },

    /// Wire bytes could not be converted to a host value.
    #[error("Type conversion error: {message}")]
    TypeConversion { message: String },

    /// No variable is bound under the given key.
    #[error("Bind variable not found: {key}")]
    BindNotFound { key: String },

    /// Parameters mix named and positional placeholders.
    #[error("Invalid bind: {message}")]
    InvalidBind { message: String },

    /// Failure reported by the transport collaborator.
    #[error("Transport error: {message}")]
    Transport { message: String },
}

impl Error {
    /// Create a type conversion error.
    pub fn type_conversion(message: impl Into<String>) -> Self {
        Self::TypeConversion {
            message: message.into(),
        }
    }

    /// Create a type mismatch error.
    pub fn type_mismatch(expected: TypeCode, actual: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected,
            actual: actual.into(),
        }
    }

    /// Create an invalid bind error.
    pub fn invalid_bind(message: impl Into<String>) -> Self {
        Self::InvalidBind {
            message: message.into(),
        }
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}
