//! Statement parameters for `Cursor::execute`.

use crate::error::{Error, Result};
use crate::protocol::types::{OracleValue, Var, VarValue};
use crate::transport::BindKey;

/// A single parameter: a host value to bind, or a caller-owned variable.
#[derive(Debug, Clone)]
pub enum BindValue {
    /// Value the cursor binds into a variable it manages.
    Value(VarValue),
    /// Variable shared with the caller.
    Var(Var),
}

impl From<Var> for BindValue {
    fn from(var: Var) -> Self {
        BindValue::Var(var)
    }
}

impl From<&Var> for BindValue {
    fn from(var: &Var) -> Self {
        BindValue::Var(var.clone())
    }
}

impl From<VarValue> for BindValue {
    fn from(value: VarValue) -> Self {
        BindValue::Value(value)
    }
}

impl From<OracleValue> for BindValue {
    fn from(value: OracleValue) -> Self {
        BindValue::Value(VarValue::Scalar(value))
    }
}

impl From<Vec<OracleValue>> for BindValue {
    fn from(values: Vec<OracleValue>) -> Self {
        BindValue::Value(VarValue::Array(values))
    }
}

impl From<&str> for BindValue {
    fn from(s: &str) -> Self {
        BindValue::Value(s.into())
    }
}

impl From<String> for BindValue {
    fn from(s: String) -> Self {
        BindValue::Value(s.into())
    }
}

impl From<i64> for BindValue {
    fn from(i: i64) -> Self {
        BindValue::Value(i.into())
    }
}

impl From<i32> for BindValue {
    fn from(i: i32) -> Self {
        BindValue::Value(i.into())
    }
}

impl From<f64> for BindValue {
    fn from(f: f64) -> Self {
        BindValue::Value(OracleValue::from(f).into())
    }
}

impl From<Vec<u8>> for BindValue {
    fn from(bytes: Vec<u8>) -> Self {
        BindValue::Value(bytes.into())
    }
}

/// Ordered set of parameters for one execution.
///
/// # Example
///
/// ```
/// use oracle_thin_vars::{OracleValue, Params};
///
/// let named = Params::new()
///     .bind("value", "String 5")
///     .bind("missing", OracleValue::Null);
/// assert_eq!(named.len(), 2);
///
/// let positional = Params::new().push(1i64).push("abc");
/// assert_eq!(positional.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Params {
    entries: Vec<(BindKey, BindValue)>,
    positional: usize,
}

impl Params {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named parameter (`:name`). Names match case-insensitively.
    pub fn bind(mut self, name: &str, value: impl Into<BindValue>) -> Self {
        self.entries.push((BindKey::name(name), value.into()));
        self
    }

    /// Add the next positional parameter (`:1`, `:2`, ...).
    pub fn push(mut self, value: impl Into<BindValue>) -> Self {
        self.positional += 1;
        self.entries
            .push((BindKey::Position(self.positional), value.into()));
        self
    }

    /// Build positional parameters from a sequence of values.
    pub fn positional<V: Into<BindValue>>(values: impl IntoIterator<Item = V>) -> Self {
        values.into_iter().fold(Self::new(), Self::push)
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over parameters in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = &(BindKey, BindValue)> {
        self.entries.iter()
    }

    /// Whether these parameters are named, positional, or absent.
    ///
    /// Fails with `Error::InvalidBind` when both styles are present.
    pub(crate) fn is_named(&self) -> Result<Option<bool>> {
        let mut styles = self.entries.iter().map(|(key, _)| key.is_named());
        let Some(first) = styles.next() else {
            return Ok(None);
        };
        if styles.any(|named| named != first) {
            return Err(Error::invalid_bind(
                "named and positional parameters cannot be mixed",
            ));
        }
        Ok(Some(first))
    }

    pub(crate) fn into_entries(self) -> Vec<(BindKey, BindValue)> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_numbering() {
        let params = Params::positional(["a", "b", "c"]);
        let keys: Vec<_> = params.iter().map(|(key, _)| key.clone()).collect();
        assert_eq!(
            keys,
            vec![BindKey::Position(1), BindKey::Position(2), BindKey::Position(3)]
        );
        assert_eq!(params.is_named(), Ok(Some(false)));
    }

    #[test]
    fn test_named_style() {
        let params = Params::new().bind(":Value", 5i64);
        assert_eq!(params.iter().next().unwrap().0, BindKey::name("VALUE"));
        assert_eq!(params.is_named(), Ok(Some(true)));
        assert_eq!(Params::new().is_named(), Ok(None));
    }

    #[test]
    fn test_mixed_styles_rejected() {
        let params = Params::new().bind("a", 1i64).push(2i64);
        assert!(matches!(params.is_named(), Err(Error::InvalidBind { .. })));
    }
}
