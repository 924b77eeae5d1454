use crate::{ObjKey, PropertyType};

/// A single cell value.
///
/// The derived ordering is the one used by [`SortDescriptor`]: values of
/// different types order as `Null < Bool < Int < String < Link`, values of
/// the same type order naturally.
///
/// [`SortDescriptor`]: crate::SortDescriptor
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Value {
    /// Absent value.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed 64-bit integer.
    Int(i64),
    /// UTF-8 string.
    String(String),
    /// Link to a row in the column's target table.
    Link(ObjKey),
}

impl Value {
    /// Returns `true` if this is [`Value::Null`].
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short description of the value's type, used in error messages.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::String(_) => "string",
            Self::Link(_) => "link",
        }
    }

    /// Returns the integer, if this is an [`Value::Int`].
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the boolean, if this is a [`Value::Bool`].
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the string, if this is a [`Value::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the link target, if this is a [`Value::Link`].
    pub const fn as_link(&self) -> Option<ObjKey> {
        match self {
            Self::Link(v) => Some(*v),
            _ => None,
        }
    }

    /// Whether a non-null value may be stored in a scalar column of type
    /// `ty`. Link lists never hold scalar values.
    pub(crate) const fn fits(&self, ty: PropertyType) -> bool {
        matches!(
            (self, ty),
            (Self::Null, _)
                | (Self::Bool(_), PropertyType::Bool)
                | (Self::Int(_), PropertyType::Int)
                | (Self::String(_), PropertyType::String)
                | (Self::Link(_), PropertyType::Object)
        ) && !matches!(ty, PropertyType::Array)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<ObjKey> for Value {
    fn from(value: ObjKey) -> Self {
        Self::Link(value)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn cross_type_order() {
        let mut values = vec![
            Value::Link(ObjKey(0)),
            Value::from("a"),
            Value::Int(-5),
            Value::Bool(true),
            Value::Null,
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                Value::Null,
                Value::Bool(true),
                Value::Int(-5),
                Value::from("a"),
                Value::Link(ObjKey(0)),
            ]
        );
    }

    #[test]
    fn fits_column_types() {
        assert!(Value::Int(1).fits(PropertyType::Int));
        assert!(!Value::Int(1).fits(PropertyType::String));
        assert!(Value::Null.fits(PropertyType::Object));
        assert!(!Value::Null.fits(PropertyType::Array));
        assert!(Value::Link(ObjKey(3)).fits(PropertyType::Object));
    }

    #[test]
    fn option_into_value() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::String("x".into()));
    }
}
