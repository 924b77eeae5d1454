use crate::{
    CellValue, ColKey, List, ObjKey, ObjectSchema, Row, StoreError, StoreResult, TransactionKind,
    Tx, Value, WriteMarker,
};
use core::fmt;
use std::sync::Arc;

/// A row viewed through its class descriptor.
///
/// Properties are addressed by name. The descriptor is shared, and travels
/// with the object through a handover unchanged.
pub struct Object<'tx, K: TransactionKind> {
    schema: Arc<ObjectSchema>,
    row: Row<'tx, K>,
}

impl<K: TransactionKind> Clone for Object<'_, K> {
    fn clone(&self) -> Self {
        Self { schema: Arc::clone(&self.schema), row: self.row }
    }
}

impl<K: TransactionKind> fmt::Debug for Object<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("class", &self.schema.name())
            .field("row", &self.row)
            .finish()
    }
}

impl<'tx, K: TransactionKind> Object<'tx, K> {
    /// Binds a descriptor to a row of the class's table.
    pub fn new(schema: Arc<ObjectSchema>, row: Row<'tx, K>) -> StoreResult<Self> {
        if row.table().name()? != schema.table_name() {
            return Err(StoreError::SchemaMismatch(schema.name().to_owned()));
        }
        Ok(Self::new_unchecked(schema, row))
    }

    pub(crate) const fn new_unchecked(schema: Arc<ObjectSchema>, row: Row<'tx, K>) -> Self {
        Self { schema, row }
    }

    /// Looks up an object of `class` by key.
    pub fn from_key(tx: &'tx Tx<K>, class: &str, obj: ObjKey) -> StoreResult<Self> {
        let schema = tx.object_schema(class)?;
        let row = tx.open_table(&schema.table_name())?.get(obj)?;
        Ok(Self::new_unchecked(schema, row))
    }

    /// The underlying row.
    #[inline]
    pub const fn row(&self) -> &Row<'tx, K> {
        &self.row
    }

    /// The class descriptor.
    #[inline]
    pub const fn object_schema(&self) -> &Arc<ObjectSchema> {
        &self.schema
    }

    /// The transaction this object is bound to.
    #[inline]
    pub const fn tx(&self) -> &'tx Tx<K> {
        self.row.tx()
    }

    /// Returns `true` if the row still exists.
    pub fn is_valid(&self) -> bool {
        self.row.is_valid()
    }

    fn column(&self, property: &str) -> StoreResult<ColKey> {
        if self.schema.property(property).is_none() {
            return Err(StoreError::NoSuchColumn(property.to_owned()));
        }
        self.row.table().column_key(property)
    }

    /// Reads a property.
    pub fn get(&self, property: &str) -> StoreResult<Value> {
        self.row.get(self.column(property)?)
    }

    /// Reads and decodes a property.
    pub fn get_as<T: CellValue>(&self, property: &str) -> StoreResult<T> {
        self.row.get_as(self.column(property)?)
    }

    /// The list stored in an array property.
    pub fn list(&self, property: &str) -> StoreResult<List<'tx, K>> {
        Ok(List::new(self.row.link_list(self.column(property)?)?))
    }
}

impl<'tx, K: WriteMarker> Object<'tx, K> {
    /// Creates a new object of `class` with every property at its default.
    pub fn create(tx: &'tx Tx<K>, class: &str) -> StoreResult<Self> {
        let schema = tx.object_schema(class)?;
        let row = tx.open_table(&schema.table_name())?.add_empty_row()?;
        Ok(Self::new_unchecked(schema, row))
    }

    /// Writes a property.
    pub fn set(&self, property: &str, value: impl Into<Value>) -> StoreResult<()> {
        self.row.set(self.column(property)?, value)
    }

    /// Removes the object.
    pub fn remove(&self) -> StoreResult<()> {
        self.row.remove()
    }
}
