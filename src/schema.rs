//! Class schema descriptors.
//!
//! An [`ObjectSchema`] describes one class: its name and its properties.
//! Once registered with [`Tx::update_schema`], descriptors are immutable and
//! shared as `Arc<ObjectSchema>`, so an [`Object`] accessor (and any
//! handover exported from it) can hold a stable reference to its class.
//!
//! [`Tx::update_schema`]: crate::Tx::update_schema
//! [`Object`]: crate::Object

use crate::PropertyFlags;
use std::{fmt, sync::Arc};

/// Prefix of the table backing each class.
pub(crate) const CLASS_TABLE_PREFIX: &str = "class_";

/// Column and property types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    /// Signed 64-bit integer.
    Int,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    String,
    /// Single link to a row of the target class.
    Object,
    /// Ordered list of links to rows of the target class.
    Array,
}

impl PropertyType {
    /// Returns `true` for the link types, which require a target.
    #[inline]
    pub const fn is_link(self) -> bool {
        matches!(self, Self::Object | Self::Array)
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Int => "int",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Object => "object",
            Self::Array => "array",
        })
    }
}

/// A single property of a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Property name, also the backing column's name.
    pub name: String,
    /// Property type.
    pub kind: PropertyType,
    /// Option flags.
    pub flags: PropertyFlags,
    /// Target class name for [`PropertyType::Object`] and
    /// [`PropertyType::Array`].
    pub object_type: Option<String>,
}

impl Property {
    /// Creates a scalar property with no flags.
    pub fn new(name: impl Into<String>, kind: PropertyType) -> Self {
        Self { name: name.into(), kind, flags: PropertyFlags::empty(), object_type: None }
    }

    /// Creates a link or link-list property targeting `object_type`.
    pub fn link(
        name: impl Into<String>,
        kind: PropertyType,
        object_type: impl Into<String>,
    ) -> Self {
        debug_assert!(kind.is_link(), "link property must be Object or Array, got {kind}");
        Self {
            name: name.into(),
            kind,
            flags: PropertyFlags::empty(),
            object_type: Some(object_type.into()),
        }
    }

    /// Marks the property nullable.
    pub fn nullable(mut self) -> Self {
        self.flags |= PropertyFlags::NULLABLE;
        self
    }

    /// Marks the property indexed.
    pub fn indexed(mut self) -> Self {
        self.flags |= PropertyFlags::INDEXED;
        self
    }

    /// Marks the property as the class's primary key.
    pub fn primary_key(mut self) -> Self {
        self.flags |= PropertyFlags::PRIMARY_KEY;
        self
    }
}

/// Immutable description of one class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSchema {
    name: String,
    properties: Vec<Property>,
}

impl ObjectSchema {
    /// Creates a class description.
    pub fn new(name: impl Into<String>, properties: impl IntoIterator<Item = Property>) -> Self {
        Self { name: name.into(), properties: properties.into_iter().collect() }
    }

    /// Class name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the table backing this class.
    pub fn table_name(&self) -> String {
        format!("{CLASS_TABLE_PREFIX}{}", self.name)
    }

    /// All properties, in column order.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Looks up a property by name.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// A set of class descriptions, applied with [`Tx::update_schema`].
///
/// [`Tx::update_schema`]: crate::Tx::update_schema
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema(Vec<ObjectSchema>);

impl Schema {
    /// Creates a schema from class descriptions.
    pub fn new(classes: impl IntoIterator<Item = ObjectSchema>) -> Self {
        classes.into_iter().collect()
    }

    /// Iterates over the classes.
    pub fn iter(&self) -> impl Iterator<Item = &ObjectSchema> {
        self.0.iter()
    }

    /// Finds a class by name.
    pub fn find(&self, name: &str) -> Option<&ObjectSchema> {
        self.0.iter().find(|c| c.name == name)
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no classes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<ObjectSchema> for Schema {
    fn from_iter<I: IntoIterator<Item = ObjectSchema>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<Arc<ObjectSchema>>> for Schema {
    fn from(classes: Vec<Arc<ObjectSchema>>) -> Self {
        classes.into_iter().map(Arc::unwrap_or_clone).collect()
    }
}
