use crate::{
    CellValue, ColKey, LinkList, ObjKey, RowTicket, StoreError, StoreResult, TableKey, TableRef,
    TransactionKind, Tx, Value, WriteMarker,
    tx::{RowTarget, Ticket},
};
use core::fmt;

/// A handle to one row, bound to a transaction.
///
/// Two rows are equal when they name the same row of the same table.
pub struct Row<'tx, K: TransactionKind> {
    tx: &'tx Tx<K>,
    table: TableKey,
    obj: ObjKey,
}

impl<K: TransactionKind> Clone for Row<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: TransactionKind> Copy for Row<'_, K> {}

impl<K: TransactionKind> PartialEq for Row<'_, K> {
    fn eq(&self, other: &Self) -> bool {
        self.table == other.table && self.obj == other.obj
    }
}

impl<K: TransactionKind> Eq for Row<'_, K> {}

impl<K: TransactionKind> fmt::Debug for Row<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Row").field("table", &self.table).field("obj", &self.obj).finish()
    }
}

impl<'tx, K: TransactionKind> Row<'tx, K> {
    pub(crate) const fn new(tx: &'tx Tx<K>, table: TableKey, obj: ObjKey) -> Self {
        Self { tx, table, obj }
    }

    /// The row's stable key.
    #[inline]
    pub const fn key(&self) -> ObjKey {
        self.obj
    }

    /// The owning table.
    #[inline]
    pub const fn table(&self) -> TableRef<'tx, K> {
        TableRef::new(self.tx, self.table)
    }

    /// The transaction this handle is bound to.
    #[inline]
    pub const fn tx(&self) -> &'tx Tx<K> {
        self.tx
    }

    /// Returns `true` if the row exists in the transaction's snapshot.
    pub fn is_valid(&self) -> bool {
        self.tx.read(|s| s.table(self.table).is_some_and(|t| t.contains(self.obj)))
    }

    /// Reads a scalar cell.
    pub fn get(&self, col: impl Into<ColKey>) -> StoreResult<Value> {
        let col = col.into();
        self.tx.read(|s| s.table_checked(self.table)?.value(self.obj, col))
    }

    /// Reads and decodes a scalar cell.
    pub fn get_as<T: CellValue>(&self, col: impl Into<ColKey>) -> StoreResult<T> {
        T::decode(self.get(col)?)
    }

    /// The link list stored in `col`.
    pub fn link_list(&self, col: impl Into<ColKey>) -> StoreResult<LinkList<'tx, K>> {
        let col = col.into();
        self.tx.read(|s| s.table_checked(self.table)?.list(self.obj, col).map(drop))?;
        Ok(LinkList::new(self.tx, self.table, self.obj, col))
    }

    /// Exports the row for import into another transaction.
    pub fn export_for_handover(&self) -> StoreResult<RowTicket> {
        if !self.is_valid() {
            return Err(StoreError::NoSuchObject(self.obj));
        }
        Ok(Ticket::new(self.tx.pin()?, RowTarget { table: self.table, obj: self.obj }))
    }
}

impl<K: WriteMarker> Row<'_, K> {
    /// Writes a scalar cell.
    pub fn set(&self, col: impl Into<ColKey>, value: impl Into<Value>) -> StoreResult<()> {
        let (col, value) = (col.into(), value.into());
        self.tx.write(|s| s.set_value(self.table, self.obj, col, value))
    }

    /// Removes the row.
    pub fn remove(&self) -> StoreResult<()> {
        self.tx.write(|s| s.remove_row(self.table, self.obj))
    }
}
