//! Typed bind variable buffers.
//!
//! A `Variable` holds one element (scalar) or a fixed number of elements
//! (array) of a single `TypeCode`, each stored in its wire encoding. Storage is
//! sized by what is actually set, never by `max_length`, so long variables cost
//! nothing until they hold data.

use bytes::Bytes;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use super::oracle_type::TypeCode;
use super::value::OracleValue;
use crate::config::NumberPolicy;
use crate::error::{Error, Result};

/// Direction of data flow for a bind variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindDirection {
    /// Supplied to the statement only.
    In,
    /// Written by the statement only.
    Out,
    /// Supplied to and written by the statement.
    InOut,
}

impl BindDirection {
    /// Whether the server writes results back into this variable.
    pub fn receives_output(&self) -> bool {
        matches!(self, BindDirection::Out | BindDirection::InOut)
    }
}

/// Value read from or written to a variable: one element or a whole array.
#[derive(Debug, Clone, PartialEq)]
pub enum VarValue {
    /// Single element.
    Scalar(OracleValue),
    /// Ordered array elements.
    Array(Vec<OracleValue>),
}

impl VarValue {
    /// Build an array value from anything convertible to `OracleValue`.
    pub fn array<V: Into<OracleValue>>(values: impl IntoIterator<Item = V>) -> Self {
        VarValue::Array(values.into_iter().map(Into::into).collect())
    }

    /// Get the scalar element, if this is a scalar.
    pub fn as_scalar(&self) -> Option<&OracleValue> {
        match self {
            VarValue::Scalar(value) => Some(value),
            VarValue::Array(_) => None,
        }
    }

    /// Get the array elements, if this is an array.
    pub fn as_array(&self) -> Option<&[OracleValue]> {
        match self {
            VarValue::Scalar(_) => None,
            VarValue::Array(values) => Some(values),
        }
    }

    /// Consume into the scalar element, if this is a scalar.
    pub fn into_scalar(self) -> Option<OracleValue> {
        match self {
            VarValue::Scalar(value) => Some(value),
            VarValue::Array(_) => None,
        }
    }

    /// Consume into the array elements, if this is an array.
    pub fn into_array(self) -> Option<Vec<OracleValue>> {
        match self {
            VarValue::Scalar(_) => None,
            VarValue::Array(values) => Some(values),
        }
    }
}

impl From<OracleValue> for VarValue {
    fn from(value: OracleValue) -> Self {
        VarValue::Scalar(value)
    }
}

impl From<Vec<OracleValue>> for VarValue {
    fn from(values: Vec<OracleValue>) -> Self {
        VarValue::Array(values)
    }
}

impl From<&str> for VarValue {
    fn from(s: &str) -> Self {
        VarValue::Scalar(s.into())
    }
}

impl From<String> for VarValue {
    fn from(s: String) -> Self {
        VarValue::Scalar(s.into())
    }
}

impl From<i64> for VarValue {
    fn from(i: i64) -> Self {
        VarValue::Scalar(i.into())
    }
}

impl From<i32> for VarValue {
    fn from(i: i32) -> Self {
        VarValue::Scalar(i.into())
    }
}

impl From<Vec<u8>> for VarValue {
    fn from(bytes: Vec<u8>) -> Self {
        VarValue::Scalar(bytes.into())
    }
}

/// Typed buffer for a bind variable.
#[derive(Debug, Clone)]
pub struct Variable {
    /// Element type.
    type_code: TypeCode,
    /// Maximum encoded length of each element in bytes.
    max_length: u32,
    /// Whether this is an array (PL/SQL index-by table) variable.
    is_array: bool,
    /// Data flow direction.
    direction: BindDirection,
    /// Wire-encoded elements, `None` for NULL. Length is fixed at creation.
    values: Vec<Option<Bytes>>,
    /// Number of leading elements last set.
    actual_elements: usize,
    /// Type was inferred from NULL and should be replaced once a value arrives.
    deferred: bool,
}

impl Variable {
    /// Create a scalar variable.
    pub fn new(type_code: TypeCode, max_length: u32) -> Self {
        Self {
            type_code,
            max_length,
            is_array: false,
            direction: BindDirection::InOut,
            values: vec![None],
            actual_elements: 0,
            deferred: false,
        }
    }

    /// Create an array variable with a fixed number of elements.
    pub fn new_array(type_code: TypeCode, max_length: u32, num_elements: usize) -> Self {
        Self {
            type_code,
            max_length,
            is_array: true,
            direction: BindDirection::InOut,
            values: vec![None; num_elements],
            actual_elements: 0,
            deferred: false,
        }
    }

    /// Create the placeholder variable bound for a NULL of unknown type.
    pub(crate) fn deferred() -> Self {
        Self {
            deferred: true,
            ..Self::new(TypeCode::String, 1)
        }
    }

    pub(crate) fn with_direction(mut self, direction: BindDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Get the element type.
    pub fn type_code(&self) -> TypeCode {
        self.type_code
    }

    /// Get the maximum encoded length of each element.
    pub fn max_length(&self) -> u32 {
        self.max_length
    }

    /// Get the number of elements.
    pub fn num_elements(&self) -> usize {
        self.values.len()
    }

    /// Number of leading elements last set by a value or by the server.
    pub fn actual_elements(&self) -> usize {
        self.actual_elements
    }

    /// Check if this is an array variable.
    pub fn is_array(&self) -> bool {
        self.is_array
    }

    /// Get the bind direction.
    pub fn direction(&self) -> BindDirection {
        self.direction
    }

    /// Set the bind direction.
    pub fn set_direction(&mut self, direction: BindDirection) {
        self.direction = direction;
    }

    /// Whether the type is still waiting for a non-NULL value.
    pub fn is_deferred(&self) -> bool {
        self.deferred
    }

    /// Wire-encoded elements.
    pub fn wire_values(&self) -> &[Option<Bytes>] {
        &self.values
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.values.len() {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange {
                index,
                len: self.values.len(),
            })
        }
    }

    pub(crate) fn check_length(&self, encoded: &Option<Bytes>) -> Result<()> {
        match encoded {
            Some(bytes) if bytes.len() > self.max_length as usize => Err(Error::ValueTooLong {
                length: bytes.len(),
                max_length: self.max_length,
            }),
            _ => Ok(()),
        }
    }

    /// Encode a single element for this variable's type and size.
    pub(crate) fn encode(&self, value: &OracleValue) -> Result<Option<Bytes>> {
        let encoded = value.to_wire(self.type_code)?;
        self.check_length(&encoded)?;
        Ok(encoded)
    }

    /// Set an element, or replace the whole array when given a sequence at index 0.
    ///
    /// A sequence shorter than the variable leaves the remaining elements NULL.
    /// Nothing is modified if any element fails to encode.
    pub fn set_value(&mut self, index: usize, value: impl Into<VarValue>) -> Result<()> {
        match value.into() {
            VarValue::Scalar(value) => {
                self.check_index(index)?;
                let encoded = self.encode(&value)?;
                self.values[index] = encoded;
                self.actual_elements = self.actual_elements.max(index + 1);
            }
            VarValue::Array(values) => {
                if !self.is_array {
                    return Err(Error::type_mismatch(self.type_code, "sequence"));
                }
                if index != 0 {
                    return Err(Error::IndexOutOfRange { index, len: 1 });
                }
                if values.len() > self.values.len() {
                    return Err(Error::IndexOutOfRange {
                        index: values.len() - 1,
                        len: self.values.len(),
                    });
                }
                let encoded = values
                    .iter()
                    .map(|v| self.encode(v))
                    .collect::<Result<Vec<_>>>()?;
                self.store_encoded(encoded);
            }
        }
        Ok(())
    }

    /// Overwrite leading elements with already-encoded data and NULL the rest.
    pub(crate) fn store_encoded(&mut self, encoded: Vec<Option<Bytes>>) {
        self.actual_elements = encoded.len();
        let tail = self.values.len() - encoded.len();
        self.values.clear();
        self.values.extend(encoded);
        self.values.extend(std::iter::repeat(None).take(tail));
    }

    /// Copy wire values written by the server back into the buffer.
    ///
    /// Returned values are held to the same length limits as values set locally.
    pub(crate) fn store_output(&mut self, output: Vec<Option<Bytes>>) -> Result<()> {
        self.check_output(&output)?;
        self.store_encoded(output);
        Ok(())
    }

    /// Check that `output` fits the buffer without storing it.
    pub(crate) fn check_output(&self, output: &[Option<Bytes>]) -> Result<()> {
        if output.len() > self.values.len() {
            return Err(Error::IndexOutOfRange {
                index: output.len() - 1,
                len: self.values.len(),
            });
        }
        output.iter().try_for_each(|encoded| self.check_length(encoded))
    }

    /// Decode a single element.
    pub fn get_value_at(&self, index: usize) -> Result<OracleValue> {
        self.check_index(index)?;
        OracleValue::from_wire(self.type_code, self.values[index].as_deref(), NumberPolicy::Text)
    }

    /// Decode the variable: the single element of a scalar, or every element of an array.
    pub fn get_value(&self) -> Result<VarValue> {
        if self.is_array {
            self.values
                .iter()
                .map(|v| OracleValue::from_wire(self.type_code, v.as_deref(), NumberPolicy::Text))
                .collect::<Result<Vec<_>>>()
                .map(VarValue::Array)
        } else {
            self.get_value_at(0).map(VarValue::Scalar)
        }
    }
}

/// Shared handle to a bind variable.
///
/// The caller and the cursor's bind table hold the same buffer, so values the
/// server writes during execution are visible through every clone. Handles are
/// deliberately neither `Send` nor `Sync`.
#[derive(Clone)]
pub struct Var(Rc<RefCell<Variable>>);

impl Var {
    /// Wrap a variable in a shared handle.
    pub fn new(variable: Variable) -> Self {
        Self(Rc::new(RefCell::new(variable)))
    }

    /// Borrow the underlying variable.
    pub fn borrow(&self) -> Ref<'_, Variable> {
        self.0.borrow()
    }

    pub(crate) fn borrow_mut(&self) -> RefMut<'_, Variable> {
        self.0.borrow_mut()
    }

    /// Get the element type.
    pub fn type_code(&self) -> TypeCode {
        self.borrow().type_code()
    }

    /// Get the bind direction.
    pub fn direction(&self) -> BindDirection {
        self.borrow().direction()
    }

    /// Set the bind direction.
    pub fn set_direction(&self, direction: BindDirection) {
        self.borrow_mut().set_direction(direction);
    }

    /// Set an element, or the whole array at index 0.
    pub fn set_value(&self, index: usize, value: impl Into<VarValue>) -> Result<()> {
        self.borrow_mut().set_value(index, value)
    }

    /// Decode the variable's current contents.
    pub fn get_value(&self) -> Result<VarValue> {
        self.borrow().get_value()
    }

    /// Decode a single element.
    pub fn get_value_at(&self, index: usize) -> Result<OracleValue> {
        self.borrow().get_value_at(index)
    }

    /// Swap in a new buffer, returning the old one.
    pub(crate) fn replace(&self, variable: Variable) -> Variable {
        self.0.replace(variable)
    }

    /// Check whether two handles share the same buffer.
    pub fn ptr_eq(&self, other: &Var) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let var = self.borrow();
        f.debug_struct("Var")
            .field("type_code", &var.type_code())
            .field("max_length", &var.max_length())
            .field("num_elements", &var.num_elements())
            .field("direction", &var.direction())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> OracleValue {
        OracleValue::String(s.to_string())
    }

    #[test]
    fn test_scalar_string_round_trip() {
        let mut var = Variable::new(TypeCode::String, 30);
        var.set_value(0, "Called").unwrap();
        assert_eq!(var.get_value().unwrap(), VarValue::Scalar(text("Called")));
    }

    #[test]
    fn test_value_too_long() {
        let mut var = Variable::new(TypeCode::String, 5);
        assert_eq!(
            var.set_value(0, "String 1"),
            Err(Error::ValueTooLong {
                length: 8,
                max_length: 5
            })
        );
        assert_eq!(var.get_value().unwrap(), VarValue::Scalar(OracleValue::Null));
    }

    #[test]
    fn test_length_counts_encoded_bytes() {
        // Four supplementary-plane characters are sixteen UTF-8 bytes
        let mut var = Variable::new(TypeCode::String, 15);
        assert!(matches!(
            var.set_value(0, "𠜎𠜱𠝹𠱓"),
            Err(Error::ValueTooLong { length: 16, .. })
        ));
    }

    #[test]
    fn test_scalar_index_out_of_range() {
        let mut var = Variable::new(TypeCode::String, 10);
        assert_eq!(
            var.set_value(1, "x"),
            Err(Error::IndexOutOfRange { index: 1, len: 1 })
        );
    }

    #[test]
    fn test_short_array_nulls_tail() {
        let mut var = Variable::new_array(TypeCode::String, 10, 20);
        let values: Vec<String> = (1..=10).map(|i| format!("String {}", i)).collect();
        var.set_value(0, VarValue::array(values.clone())).unwrap();

        let got = var.get_value().unwrap().into_array().unwrap();
        assert_eq!(got.len(), 20);
        for (i, value) in values.iter().enumerate() {
            assert_eq!(got[i], text(value));
        }
        assert!(got[10..].iter().all(OracleValue::is_null));
        assert_eq!(var.actual_elements(), 10);
        assert_eq!(var.num_elements(), 20);
    }

    #[test]
    fn test_array_replace_shrinks_contents_not_capacity() {
        let mut var = Variable::new_array(TypeCode::Number, 22, 4);
        var.set_value(0, VarValue::array([1i64, 2, 3, 4])).unwrap();
        var.set_value(0, VarValue::array([9i64])).unwrap();

        let got = var.get_value().unwrap().into_array().unwrap();
        assert_eq!(
            got,
            vec![
                OracleValue::Integer(9),
                OracleValue::Null,
                OracleValue::Null,
                OracleValue::Null
            ]
        );
    }

    #[test]
    fn test_array_too_many_elements() {
        let mut var = Variable::new_array(TypeCode::String, 10, 2);
        assert_eq!(
            var.set_value(0, VarValue::array(["a", "b", "c"])),
            Err(Error::IndexOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_array_element_too_long_leaves_buffer_untouched() {
        let mut var = Variable::new_array(TypeCode::String, 3, 2);
        var.set_value(0, VarValue::array(["abc"])).unwrap();
        assert!(var.set_value(0, VarValue::array(["ok", "too long"])).is_err());
        assert_eq!(var.get_value_at(0).unwrap(), text("abc"));
    }

    #[test]
    fn test_sequence_into_scalar_is_mismatch() {
        let mut var = Variable::new(TypeCode::String, 10);
        assert!(matches!(
            var.set_value(0, VarValue::array(["a"])),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_single_element_of_array() {
        let mut var = Variable::new_array(TypeCode::Binary, 10, 3);
        var.set_value(2, b"Raw 4".to_vec()).unwrap();
        assert_eq!(var.get_value_at(2).unwrap(), OracleValue::Raw(b"Raw 4".to_vec()));
        assert_eq!(var.get_value_at(0).unwrap(), OracleValue::Null);
        assert_eq!(var.actual_elements(), 3);
    }

    #[test]
    fn test_integral_float_reads_back_as_integer() {
        let mut var = Variable::new(TypeCode::Number, 22);
        var.set_value(0, OracleValue::Float(1.0)).unwrap();
        assert_eq!(var.get_value_at(0).unwrap(), OracleValue::Integer(1));

        var.set_value(0, OracleValue::Float(1.5)).unwrap();
        assert_eq!(var.get_value_at(0).unwrap(), OracleValue::Float(1.5));
    }

    #[test]
    fn test_store_output_checks_length() {
        let mut var = Variable::new(TypeCode::String, 3);
        assert!(matches!(
            var.store_output(vec![Some(Bytes::from_static(b"TSI (I)"))]),
            Err(Error::ValueTooLong { .. })
        ));
        var.store_output(vec![Some(Bytes::from_static(b"TSI"))]).unwrap();
        assert_eq!(var.get_value_at(0).unwrap(), text("TSI"));
    }

    #[test]
    fn test_shared_handle_sees_updates() {
        let var = Var::new(Variable::new(TypeCode::String, 30));
        let alias = var.clone();
        alias.set_value(0, "InVal").unwrap();
        assert!(var.ptr_eq(&alias));
        assert_eq!(var.get_value().unwrap(), VarValue::Scalar(text("InVal")));
    }

    #[test]
    fn test_deferred_placeholder() {
        let var = Variable::deferred();
        assert!(var.is_deferred());
        assert_eq!(var.type_code(), TypeCode::String);
        assert_eq!(var.max_length(), 1);
    }
}
