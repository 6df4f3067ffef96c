//! Data type codecs for Oracle wire values.
//!
//! ## Currently Supported
//!
//! | Oracle Type | Module |
//! |-------------|--------|
//! | NUMBER      | `number` |
//!
//! String types (VARCHAR2, CHAR, LONG, ROWID) use UTF-8 and RAW is passed
//! through, so neither requires a dedicated codec.

mod number;

pub use number::{decode_oracle_number, encode_oracle_number};
