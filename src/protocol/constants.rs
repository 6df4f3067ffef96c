//! Oracle wire constants used by the marshaling layer.
//!
//! These constants are derived from the python-oracledb thin client implementation.

// Oracle type numbers
pub const ORA_TYPE_NUM_CHAR: u16 = 96;
pub const ORA_TYPE_NUM_LONG: u16 = 8;
pub const ORA_TYPE_NUM_NUMBER: u16 = 2;
pub const ORA_TYPE_NUM_RAW: u16 = 23;
pub const ORA_TYPE_NUM_ROWID: u16 = 11;
pub const ORA_TYPE_NUM_UROWID: u16 = 208;
pub const ORA_TYPE_NUM_VARCHAR: u16 = 1;

// Maximum sizes
pub const TNS_MAX_NUMBER_LENGTH: u32 = 22;
pub const TNS_MAX_SHORT_LENGTH: u32 = 4000;
pub const TNS_MAX_CHAR_LENGTH: u32 = 2000;
pub const TNS_MAX_ROWID_LENGTH: u32 = 18;
pub const TNS_MAX_UROWID_LENGTH: u32 = 4000;
pub const TNS_MAX_LONG_LENGTH: u32 = 0x7fffffff;

// Maximum bytes per character in the UTF-8 client character set
pub const TNS_MAX_BYTES_PER_CHAR: u32 = 4;

// Display size reported for NUMBER columns without a declared precision
pub const TNS_NUMBER_DEFAULT_DISPLAY_SIZE: u32 = 127;

// Oracle NUMBER encoding
pub const TNS_NUMBER_MAX_DIGITS: usize = 40;
pub const TNS_NUMBER_NEGATIVE_TERMINATOR: u8 = 102;
