//! Decoded result rows.

use std::sync::Arc;

use super::column::{ColumnDescriptor, ColumnInfo};
use super::value::OracleValue;
use crate::error::{Error, Result};

/// One fetched row: positional values plus the result set's shared descriptors.
#[derive(Debug, Clone)]
pub struct Row {
    values: Vec<OracleValue>,
    /// Descriptors shared by every row of the result set.
    columns: Arc<ColumnInfo>,
}

impl Row {
    /// Create a row from decoded values.
    pub fn new(values: Vec<OracleValue>, columns: Arc<ColumnInfo>) -> Self {
        Self { values, columns }
    }

    /// Value at a column position (0-based).
    pub fn get(&self, index: usize) -> Option<&OracleValue> {
        self.values.get(index)
    }

    /// Value at a column position, failing with `Error::IndexOutOfRange`.
    pub fn try_get(&self, index: usize) -> Result<&OracleValue> {
        self.values.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.values.len(),
        })
    }

    /// Value of a named column. Names match case-insensitively.
    pub fn get_by_name(&self, name: &str) -> Option<&OracleValue> {
        let index = self.columns.find_by_name(name)?;
        self.values.get(index)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[OracleValue] {
        &self.values
    }

    /// Consume the row into its values.
    pub fn into_values(self) -> Vec<OracleValue> {
        self.values
    }

    /// Descriptors of the result set this row belongs to.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns.columns
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OracleValue> {
        self.values.iter()
    }
}

/// Rows compare by value; column info is shared metadata.
impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl PartialEq<[OracleValue]> for Row {
    fn eq(&self, other: &[OracleValue]) -> bool {
        self.values == other
    }
}

impl PartialEq<Vec<OracleValue>> for Row {
    fn eq(&self, other: &Vec<OracleValue>) -> bool {
        &self.values == other
    }
}

impl IntoIterator for Row {
    type Item = OracleValue;
    type IntoIter = std::vec::IntoIter<OracleValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a OracleValue;
    type IntoIter = std::slice::Iter<'a, OracleValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
