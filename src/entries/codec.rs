use crate::{ObjKey, StoreError, StoreResult, Value};

/// Decodes cell values read from a row into Rust types.
///
/// Implement this trait to read custom types directly from rows with
/// [`Row::get_as`] and [`Object::get_as`].
///
/// # Built-in Implementations
///
/// - [`Value`] - Returns the cell unchanged
/// - [`i64`], [`bool`], [`String`] - Fail on null or a different type
/// - `Option<T>` for the above and [`ObjKey`] - Map null to `None`
///
/// # Example
///
/// ```
/// use signet_handover::{CellValue, StoreError, StoreResult, Value};
///
/// struct Age(u8);
///
/// impl CellValue for Age {
///     fn decode(value: Value) -> StoreResult<Self> {
///         let found = value.type_name();
///         value
///             .as_int()
///             .and_then(|v| u8::try_from(v).ok())
///             .map(Age)
///             .ok_or(StoreError::DecodeTypeMismatch { wanted: "Age", found })
///     }
/// }
///
/// assert_eq!(Age::decode(Value::Int(42)).unwrap().0, 42);
/// assert!(Age::decode(Value::Int(-1)).is_err());
/// ```
///
/// [`Row::get_as`]: crate::Row::get_as
/// [`Object::get_as`]: crate::Object::get_as
pub trait CellValue: Sized {
    /// Decodes the value. Return [`StoreError::DecodeTypeMismatch`] if the
    /// stored value has the wrong shape.
    fn decode(value: Value) -> StoreResult<Self>;
}

const fn mismatch(wanted: &'static str, value: &Value) -> StoreError {
    StoreError::DecodeTypeMismatch { wanted, found: value.type_name() }
}

impl CellValue for Value {
    fn decode(value: Value) -> StoreResult<Self> {
        Ok(value)
    }
}

impl CellValue for i64 {
    fn decode(value: Value) -> StoreResult<Self> {
        value.as_int().ok_or_else(|| mismatch("i64", &value))
    }
}

impl CellValue for bool {
    fn decode(value: Value) -> StoreResult<Self> {
        value.as_bool().ok_or_else(|| mismatch("bool", &value))
    }
}

impl CellValue for String {
    fn decode(value: Value) -> StoreResult<Self> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(mismatch("String", &other)),
        }
    }
}

impl CellValue for ObjKey {
    fn decode(value: Value) -> StoreResult<Self> {
        value.as_link().ok_or_else(|| mismatch("ObjKey", &value))
    }
}

impl<T> CellValue for Option<T>
where
    T: CellValue,
{
    fn decode(value: Value) -> StoreResult<Self> {
        if value.is_null() { Ok(None) } else { T::decode(value).map(Some) }
    }
}
