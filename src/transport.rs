//! Boundary with the external database transport.
//!
//! The cursor never talks to a server directly. It hands wire-encoded bind
//! values to a `Transport`, reads back whatever the transport wrote into
//! OUT/INOUT binds, and pulls raw column data for fetched rows.

use bytes::Bytes;
use std::fmt;

use crate::error::Result;
use crate::protocol::types::{BindDirection, ColumnMetadata, TypeCode};

/// Placeholder a bind variable is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BindKey {
    /// Named placeholder (`:value`), stored upper-case.
    Name(String),
    /// Positional placeholder (`:1`), 1-based.
    Position(usize),
}

impl BindKey {
    /// Create a named key. Names match case-insensitively.
    pub fn name(name: impl AsRef<str>) -> Self {
        BindKey::Name(name.as_ref().trim_start_matches(':').to_uppercase())
    }

    /// Create a positional key (1-based).
    pub fn position(position: usize) -> Self {
        BindKey::Position(position)
    }

    /// Whether this is a named key.
    pub fn is_named(&self) -> bool {
        matches!(self, BindKey::Name(_))
    }
}

impl fmt::Display for BindKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindKey::Name(name) => write!(f, ":{}", name),
            BindKey::Position(pos) => write!(f, ":{}", pos),
        }
    }
}

impl From<&str> for BindKey {
    fn from(name: &str) -> Self {
        BindKey::name(name)
    }
}

impl From<usize> for BindKey {
    fn from(position: usize) -> Self {
        BindKey::Position(position)
    }
}

/// Wire view of one bind variable for a single execution.
#[derive(Debug, Clone)]
pub struct BindParam {
    /// Placeholder this variable is bound to.
    pub key: BindKey,
    /// Element type.
    pub type_code: TypeCode,
    /// Maximum encoded length of each element.
    pub max_length: u32,
    /// Whether this is an array bind.
    pub is_array: bool,
    /// Number of elements the buffer holds.
    pub num_elements: usize,
    /// Data flow direction.
    pub direction: BindDirection,
    /// Wire-encoded elements, `None` for NULL.
    ///
    /// For OUT and INOUT binds the transport replaces these with the values
    /// written by the statement; at most `num_elements` entries, each at most
    /// `max_length` bytes.
    pub values: Vec<Option<Bytes>>,
}

/// Result of executing a statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecuteResponse {
    /// Rows affected by DML (0 for queries and PL/SQL).
    pub rows_affected: u64,
}

/// Raw rows returned by a fetch.
#[derive(Debug, Clone, Default)]
pub struct FetchResponse {
    /// Column value tuples, `None` for NULL.
    pub rows: Vec<Vec<Option<Bytes>>>,
    /// Whether the server has more rows.
    pub more_rows: bool,
}

/// Synchronous request/response contract with the database.
pub trait Transport {
    /// Execute a statement with the given binds.
    ///
    /// The transport may overwrite `values` of OUT and INOUT binds.
    fn execute(&mut self, sql: &str, binds: &mut [BindParam]) -> Result<ExecuteResponse>;

    /// Fetch up to `max_rows` rows of the current result set.
    fn fetch_raw(&mut self, max_rows: u32) -> Result<FetchResponse>;

    /// Describe the columns of the last executed statement (empty if not a query).
    fn describe_columns(&self) -> Result<Vec<ColumnMetadata>>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn execute(&mut self, sql: &str, binds: &mut [BindParam]) -> Result<ExecuteResponse> {
        (**self).execute(sql, binds)
    }

    fn fetch_raw(&mut self, max_rows: u32) -> Result<FetchResponse> {
        (**self).fetch_raw(max_rows)
    }

    fn describe_columns(&self) -> Result<Vec<ColumnMetadata>> {
        (**self).describe_columns()
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&mut self, sql: &str, binds: &mut [BindParam]) -> Result<ExecuteResponse> {
        (**self).execute(sql, binds)
    }

    fn fetch_raw(&mut self, max_rows: u32) -> Result<FetchResponse> {
        (**self).fetch_raw(max_rows)
    }

    fn describe_columns(&self) -> Result<Vec<ColumnMetadata>> {
        (**self).describe_columns()
    }
}
