use crate::{
    ColKey, ObjKey, Query, Row, StoreError, StoreResult, TableKey, TableTicket, TransactionKind,
    Tx, WriteMarker, sys::snapshot::TableData, tx::TableTarget, tx::Ticket,
};
use core::fmt;

/// A handle to a table, bound to a transaction.
pub struct TableRef<'tx, K: TransactionKind> {
    tx: &'tx Tx<K>,
    key: TableKey,
}

impl<K: TransactionKind> Clone for TableRef<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: TransactionKind> Copy for TableRef<'_, K> {}

impl<K: TransactionKind> fmt::Debug for TableRef<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableRef").field("key", &self.key).finish()
    }
}

impl<'tx, K: TransactionKind> TableRef<'tx, K> {
    pub(crate) const fn new(tx: &'tx Tx<K>, key: TableKey) -> Self {
        Self { tx, key }
    }

    /// The table's stable key.
    #[inline]
    pub const fn key(&self) -> TableKey {
        self.key
    }

    /// The transaction this handle is bound to.
    #[inline]
    pub const fn tx(&self) -> &'tx Tx<K> {
        self.tx
    }

    /// Returns `true` if the table exists in the transaction's snapshot.
    pub fn is_valid(&self) -> bool {
        self.tx.read(|s| s.table(self.key).is_some())
    }

    fn with<R>(&self, f: impl FnOnce(&TableData) -> StoreResult<R>) -> StoreResult<R> {
        self.tx.read(|s| f(s.table_checked(self.key)?))
    }

    /// The table's name.
    pub fn name(&self) -> StoreResult<String> {
        self.with(|t| Ok(t.name().to_owned()))
    }

    /// Number of rows.
    pub fn len(&self) -> StoreResult<usize> {
        self.with(|t| Ok(t.len()))
    }

    /// Returns `true` if the table has no rows.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Row keys in creation order.
    pub fn keys(&self) -> StoreResult<Vec<ObjKey>> {
        self.with(|t| Ok(t.keys().collect()))
    }

    /// Column names in column order.
    pub fn column_names(&self) -> StoreResult<Vec<String>> {
        self.with(|t| Ok(t.columns().iter().map(|c| c.name.clone()).collect()))
    }

    /// Looks up a column by name.
    pub fn column_key(&self, name: &str) -> StoreResult<ColKey> {
        self.with(|t| t.column_key(name))
    }

    /// The row with the given key.
    pub fn get(&self, obj: ObjKey) -> StoreResult<Row<'tx, K>> {
        self.with(|t| if t.contains(obj) { Ok(()) } else { Err(StoreError::NoSuchObject(obj)) })?;
        Ok(Row::new(self.tx, self.key, obj))
    }

    /// The row at `index` in creation order.
    pub fn row_at(&self, index: usize) -> StoreResult<Row<'tx, K>> {
        let obj = self.with(|t| {
            t.keys().nth(index).ok_or(StoreError::IndexOutOfBounds { index, len: t.len() })
        })?;
        Ok(Row::new(self.tx, self.key, obj))
    }

    /// Starts a query matching every row of the table.
    pub fn where_(&self) -> Query<'tx, K> {
        Query::new(*self)
    }

    /// Exports the table for import into another transaction.
    pub fn export_for_handover(&self) -> StoreResult<TableTicket> {
        self.with(|_| Ok(()))?;
        Ok(Ticket::new(self.tx.pin()?, TableTarget { table: self.key }))
    }
}

impl<'tx, K: WriteMarker> TableRef<'tx, K> {
    /// Appends a row with every column at its default.
    pub fn add_empty_row(&self) -> StoreResult<Row<'tx, K>> {
        let obj = self.tx.write(|s| s.create_row(self.key))?;
        Ok(Row::new(self.tx, self.key, obj))
    }

    /// Removes a row, nulling links to it and removing it from link lists.
    pub fn remove(&self, obj: ObjKey) -> StoreResult<()> {
        self.tx.write(|s| s.remove_row(self.key, obj))
    }
}
