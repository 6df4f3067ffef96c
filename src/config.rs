//! Cursor configuration.

use crate::protocol::constants::TNS_MAX_SHORT_LENGTH;

/// Default number of rows requested from the transport per fetch.
pub const DEFAULT_ARRAYSIZE: u32 = 100;

/// How fetched NUMBER values that do not fit an i64 or f64 exactly are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberPolicy {
    /// Fail with `Error::PrecisionLoss`.
    #[default]
    Strict,
    /// Keep the exact decimal text as `OracleValue::Number`.
    Text,
}

/// Configuration for a cursor.
#[derive(Debug, Clone)]
pub struct CursorConfig {
    /// Rows requested per transport fetch, and the default for `fetch_many`.
    pub arraysize: u32,
    /// Largest size bound as STRING; integer input sizes above it become LONG_STRING.
    pub max_string_size: u32,
    /// Narrowing policy applied when decoding fetched NUMBER columns.
    pub number_policy: NumberPolicy,
}

impl CursorConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self {
            arraysize: DEFAULT_ARRAYSIZE,
            max_string_size: TNS_MAX_SHORT_LENGTH,
            number_policy: NumberPolicy::Strict,
        }
    }

    /// Set the fetch array size. Zero is treated as one.
    pub fn with_arraysize(mut self, arraysize: u32) -> Self {
        self.arraysize = arraysize.max(1);
        self
    }

    /// Set the maximum STRING size.
    pub fn with_max_string_size(mut self, max_string_size: u32) -> Self {
        self.max_string_size = max_string_size;
        self
    }

    /// Set the NUMBER narrowing policy.
    pub fn with_number_policy(mut self, number_policy: NumberPolicy) -> Self {
        self.number_policy = number_policy;
        self
    }
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self::new()
    }
}
