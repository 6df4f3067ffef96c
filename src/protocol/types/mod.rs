//! Bind and column data types.

mod binder;
mod codec;
mod column;
mod metadata;
mod oracle_type;
mod row;
mod value;
mod variable;

pub use binder::{InputSize, TypeBinder};
pub use codec::RowCodec;
pub use column::{ColumnDescriptor, ColumnInfo, DescriptionTuple};
pub use metadata::ColumnMetadata;
pub use oracle_type::TypeCode;
pub use row::Row;
pub use value::OracleValue;
pub use variable::{BindDirection, Var, VarValue, Variable};
