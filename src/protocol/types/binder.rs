//! Construction of bind variables from host values.
//!
//! `TypeBinder` decides the type code, maximum length and element count of a
//! variable from the value being bound and an optional input size hint. It is
//! pure: it builds a new `Variable` and touches nothing else.

use bytes::Bytes;

use super::oracle_type::TypeCode;
use super::value::OracleValue;
use super::variable::{BindDirection, VarValue, Variable};
use crate::error::Result;

/// Input size hint for a bind position, as given to `set_input_sizes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSize {
    /// Bind as this type with its default size.
    Type(TypeCode),
    /// Bind as a string of this many bytes (LONG_STRING above the string limit).
    Size(u32),
    /// Bind an array of this type whose elements are at most this many bytes.
    Array(TypeCode, u32),
}

/// Builds bind variables from host values.
#[derive(Debug, Clone)]
pub struct TypeBinder {
    /// Largest STRING size before sizes are promoted to LONG_STRING.
    max_string_size: u32,
}

impl TypeBinder {
    /// Create a binder with the given maximum STRING size.
    pub fn new(max_string_size: u32) -> Self {
        Self { max_string_size }
    }

    /// Create an empty variable for an input size hint.
    ///
    /// Returns `None` for array hints, which need the bound value to size the
    /// element count.
    pub fn variable_for(&self, hint: InputSize) -> Option<Variable> {
        match hint {
            InputSize::Type(type_code) => {
                Some(Variable::new(type_code, type_code.default_max_length()))
            }
            InputSize::Size(size) => Some(Variable::new(self.sized_string_type(size), size)),
            InputSize::Array(..) => None,
        }
    }

    /// Build an input variable holding `value`.
    ///
    /// With a hint the value is coerced to the hinted type and any mismatch
    /// fails with `Error::TypeMismatch`; without one the type is inferred from
    /// the value's shape. A NULL of unknown type binds as a deferred one-byte
    /// STRING.
    pub fn bind(&self, value: &VarValue, hint: Option<InputSize>) -> Result<Variable> {
        let variable = match value {
            VarValue::Scalar(value) => self.bind_scalar(value, hint)?,
            VarValue::Array(values) => self.bind_array(values, hint)?,
        };
        Ok(variable.with_direction(BindDirection::In))
    }

    fn bind_scalar(&self, value: &OracleValue, hint: Option<InputSize>) -> Result<Variable> {
        let (type_code, fixed_size) = match hint {
            Some(InputSize::Type(type_code)) => (type_code, None),
            Some(InputSize::Size(size)) => (self.sized_string_type(size), Some(size)),
            Some(InputSize::Array(type_code, size)) => (type_code, Some(size)),
            None => match value.inferred_type() {
                Some(type_code) => (type_code, None),
                None => return Ok(Variable::deferred()),
            },
        };

        let encoded = value.to_wire(type_code)?;
        let max_length = fixed_size.unwrap_or_else(|| size_for(type_code, [&encoded]));

        let mut variable = Variable::new(type_code, max_length);
        variable.check_length(&encoded)?;
        variable.store_encoded(vec![encoded]);
        Ok(variable)
    }

    fn bind_array(&self, values: &[OracleValue], hint: Option<InputSize>) -> Result<Variable> {
        let (type_code, fixed_size) = match hint {
            Some(InputSize::Type(type_code)) => (type_code, None),
            Some(InputSize::Size(size)) => (self.sized_string_type(size), Some(size)),
            Some(InputSize::Array(type_code, size)) => (type_code, Some(size)),
            None => match values.iter().find_map(OracleValue::inferred_type) {
                Some(type_code) => (type_code, None),
                None => (TypeCode::String, None),
            },
        };

        let encoded = values
            .iter()
            .map(|v| v.to_wire(type_code))
            .collect::<Result<Vec<_>>>()?;
        let max_length = fixed_size.unwrap_or_else(|| size_for(type_code, &encoded));

        let mut variable = Variable::new_array(type_code, max_length, values.len());
        for element in &encoded {
            variable.check_length(element)?;
        }
        variable.store_encoded(encoded);
        Ok(variable)
    }

    fn sized_string_type(&self, size: u32) -> TypeCode {
        if size > self.max_string_size {
            TypeCode::LongString
        } else {
            TypeCode::String
        }
    }
}

/// Size a variable to hold the given encoded elements.
fn size_for<'a>(type_code: TypeCode, encoded: impl IntoIterator<Item = &'a Option<Bytes>>) -> u32 {
    match type_code {
        TypeCode::Number | TypeCode::Rowid => type_code.default_max_length(),
        _ => encoded
            .into_iter()
            .flatten()
            .map(|bytes| bytes.len() as u32)
            .max()
            .unwrap_or(0)
            .max(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn binder() -> TypeBinder {
        TypeBinder::new(4000)
    }

    #[test]
    fn test_infer_scalar_types() {
        let cases = [
            (OracleValue::from("String 5"), TypeCode::String, 8),
            (OracleValue::from(b"Raw 4".to_vec()), TypeCode::Binary, 5),
            (OracleValue::from(5i64), TypeCode::Number, 22),
            (OracleValue::Rowid("AAAR3sAAEAAAACXAAC".into()), TypeCode::Rowid, 18),
        ];
        for (value, type_code, max_length) in cases {
            let var = binder().bind(&VarValue::Scalar(value.clone()), None).unwrap();
            assert_eq!(var.type_code(), type_code);
            assert_eq!(var.max_length(), max_length);
            assert_eq!(var.direction(), BindDirection::In);
            assert_eq!(var.get_value_at(0).unwrap(), value);
        }
    }

    #[test]
    fn test_null_defers_type() {
        let var = binder().bind(&VarValue::Scalar(OracleValue::Null), None).unwrap();
        assert!(var.is_deferred());
        assert_eq!(var.type_code(), TypeCode::String);
        assert_eq!(var.max_length(), 1);
    }

    #[test]
    fn test_declared_type_coerces() {
        let var = binder()
            .bind(&"42".into(), Some(InputSize::Type(TypeCode::Number)))
            .unwrap();
        assert_eq!(var.type_code(), TypeCode::Number);
        assert_eq!(var.get_value_at(0).unwrap(), OracleValue::Integer(42));

        let var = binder()
            .bind(&"Raw 4".into(), Some(InputSize::Type(TypeCode::Binary)))
            .unwrap();
        assert_eq!(var.get_value_at(0).unwrap(), OracleValue::Raw(b"Raw 4".to_vec()));
    }

    #[test]
    fn test_declared_type_mismatch() {
        let result = binder().bind(&"String 6".into(), Some(InputSize::Type(TypeCode::Number)));
        assert!(matches!(
            result,
            Err(Error::TypeMismatch {
                expected: TypeCode::Number,
                ..
            })
        ));
    }

    #[test]
    fn test_size_hint_is_fixed() {
        let result = binder().bind(&"X".repeat(31).into(), Some(InputSize::Size(30)));
        assert!(matches!(result, Err(Error::ValueTooLong { length: 31, max_length: 30 })));
    }

    #[test]
    fn test_large_size_hint_is_long_string() {
        let var = binder().variable_for(InputSize::Size(90000)).unwrap();
        assert_eq!(var.type_code(), TypeCode::LongString);
        assert_eq!(var.max_length(), 90000);

        let var = binder().variable_for(InputSize::Size(30)).unwrap();
        assert_eq!(var.type_code(), TypeCode::String);
        assert!(binder().variable_for(InputSize::Array(TypeCode::String, 10)).is_none());
    }

    #[test]
    fn test_array_sized_by_longest_element() {
        let values = VarValue::array(["a", "String 10", "abc"]);
        let var = binder().bind(&values, None).unwrap();
        assert!(var.is_array());
        assert_eq!(var.num_elements(), 3);
        assert_eq!(var.max_length(), 9);
    }

    #[test]
    fn test_array_hint_uses_given_size() {
        let values = VarValue::array(["a", "b"]);
        let var = binder()
            .bind(&values, Some(InputSize::Array(TypeCode::String, 10)))
            .unwrap();
        assert_eq!(var.max_length(), 10);
        assert_eq!(var.num_elements(), 2);

        let too_long = VarValue::array(["String 10 plus"]);
        assert!(binder()
            .bind(&too_long, Some(InputSize::Array(TypeCode::String, 10)))
            .is_err());
    }

    #[test]
    fn test_array_of_mixed_shapes_is_mismatch() {
        let values = VarValue::Array(vec![OracleValue::Integer(1), OracleValue::from("a")]);
        assert!(matches!(
            binder().bind(&values, None),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_array_of_nulls_is_string() {
        let values = VarValue::Array(vec![OracleValue::Null, OracleValue::Null]);
        let var = binder().bind(&values, None).unwrap();
        assert_eq!(var.type_code(), TypeCode::String);
        assert_eq!(var.max_length(), 1);
        assert_eq!(var.num_elements(), 2);
    }
}
