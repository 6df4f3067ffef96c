//! Bind and fetch variable marshaling for an Oracle thin client.
//!
//! This crate sits between host values and the Oracle wire format. It builds
//! typed bind variables (`TypeBinder`, `Variable`), encodes and decodes their
//! elements, and turns raw fetched column data into typed rows (`RowCodec`).
//! A `Cursor` ties these together over any `Transport`.
//!
//! # Example
//!
//! ```
//! use oracle_thin_vars::{OracleValue, TypeCode, Var, VarValue, Variable};
//!
//! // Array of 20 strings, each at most 10 bytes
//! let var = Var::new(Variable::new_array(TypeCode::String, 10, 20));
//! var.set_value(0, VarValue::array(["String 1", "String 2"])).unwrap();
//!
//! let values = var.get_value().unwrap().into_array().unwrap();
//! assert_eq!(values.len(), 20);
//! assert_eq!(values[1], OracleValue::from("String 2"));
//! assert!(values[2].is_null());
//! ```

pub mod config;
pub mod cursor;
pub mod error;
pub mod params;
pub mod protocol;
pub mod transport;

// Re-export main types
pub use config::{CursorConfig, NumberPolicy};
pub use cursor::Cursor;
pub use error::{Error, Result};
pub use params::{BindValue, Params};
pub use protocol::types::{
    BindDirection, ColumnDescriptor, ColumnInfo, ColumnMetadata, DescriptionTuple, InputSize,
    OracleValue, Row, RowCodec, TypeBinder, TypeCode, Var, VarValue, Variable,
};
pub use transport::{BindKey, BindParam, ExecuteResponse, FetchResponse, Transport};
