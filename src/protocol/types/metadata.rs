//! Column metadata as reported by the transport.
//!
//! This struct preserves the raw wire describe data.
//! For user-facing API, use `ColumnDescriptor` produced by `RowCodec::describe`.

/// Column metadata from the transport's describe step.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMetadata {
    /// Column name.
    pub name: String,
    /// Oracle data type number (raw wire format).
    pub oracle_type: u16,
    /// Maximum size in bytes.
    pub max_size: u32,
    /// Maximum size in characters (0 for non-character types).
    pub char_size: u32,
    /// Numeric precision.
    pub precision: i8,
    /// Numeric scale.
    pub scale: i8,
    /// Whether NULL values are allowed.
    pub nullable: bool,
}

impl ColumnMetadata {
    /// Create new column metadata with minimal info.
    pub fn new(name: impl Into<String>, oracle_type: u16) -> Self {
        Self {
            name: name.into(),
            oracle_type,
            max_size: 0,
            char_size: 0,
            precision: 0,
            scale: 0,
            nullable: true,
        }
    }

    /// Set byte and character sizes.
    pub fn with_size(mut self, max_size: u32, char_size: u32) -> Self {
        self.max_size = max_size;
        self.char_size = char_size;
        self
    }

    /// Set numeric precision and scale.
    pub fn with_precision(mut self, precision: i8, scale: i8) -> Self {
        self.precision = precision;
        self.scale = scale;
        self
    }

    /// Set nullability.
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }
}
