//! ColumnDescriptor and ColumnInfo types for user-facing API.
//!
//! These types provide a clean interface for accessing column information
//! from query results, derived from the transport's `ColumnMetadata`.

use super::oracle_type::TypeCode;

/// Column description tuple: name, type, display size, internal size,
/// precision, scale, nullable.
pub type DescriptionTuple = (
    String,
    TypeCode,
    Option<u32>,
    Option<u32>,
    Option<i8>,
    Option<i8>,
    bool,
);

/// A column in a result set (user-facing representation).
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor {
    /// Column name.
    pub name: String,
    /// Column type.
    pub type_code: TypeCode,
    /// Display size in characters.
    pub display_size: Option<u32>,
    /// Internal size in bytes.
    pub internal_size: Option<u32>,
    /// Numeric precision (NUMBER only).
    pub precision: Option<i8>,
    /// Numeric scale (NUMBER only).
    pub scale: Option<i8>,
    /// Whether NULL values are allowed.
    pub nullable: bool,
}

impl ColumnDescriptor {
    /// Get the descriptor as a description tuple.
    pub fn to_tuple(&self) -> DescriptionTuple {
        (
            self.name.clone(),
            self.type_code,
            self.display_size,
            self.internal_size,
            self.precision,
            self.scale,
            self.nullable,
        )
    }
}

/// Shared column information for all rows in a result set.
#[derive(Debug, Clone, Default)]
pub struct ColumnInfo {
    /// Column definitions.
    pub columns: Vec<ColumnDescriptor>,
}

impl ColumnInfo {
    /// Create new column info from descriptors.
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        Self { columns }
    }

    /// Get column names.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Get the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Get column by index.
    pub fn get(&self, index: usize) -> Option<&ColumnDescriptor> {
        self.columns.get(index)
    }

    /// Find column index by name (case-insensitive).
    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }
}
