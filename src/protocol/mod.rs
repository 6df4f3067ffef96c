//! Oracle wire types and codecs for bind and fetch marshaling.

pub mod constants;
pub mod decode;
pub mod types;

pub use types::{
    BindDirection, ColumnDescriptor, ColumnInfo, ColumnMetadata, InputSize, OracleValue, Row,
    RowCodec, TypeBinder, TypeCode, Var, VarValue, Variable,
};
