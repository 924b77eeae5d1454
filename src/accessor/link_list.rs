use crate::{
    ColKey, LinkListTicket, ObjKey, Row, StoreError, StoreResult, TableKey, TableRef,
    TransactionKind, Tx, WriteMarker,
    sys::snapshot::Snapshot,
    tx::{LinkListTarget, Ticket},
};
use core::fmt;

/// An ordered list of links stored in one cell, bound to a transaction.
///
/// The list is identified by its owning row and column and is read afresh
/// on every call.
pub struct LinkList<'tx, K: TransactionKind> {
    tx: &'tx Tx<K>,
    table: TableKey,
    obj: ObjKey,
    col: ColKey,
}

impl<K: TransactionKind> Clone for LinkList<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: TransactionKind> Copy for LinkList<'_, K> {}

impl<K: TransactionKind> fmt::Debug for LinkList<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkList")
            .field("table", &self.table)
            .field("obj", &self.obj)
            .field("col", &self.col)
            .finish()
    }
}

impl<'tx, K: TransactionKind> LinkList<'tx, K> {
    pub(crate) const fn new(tx: &'tx Tx<K>, table: TableKey, obj: ObjKey, col: ColKey) -> Self {
        Self { tx, table, obj, col }
    }

    /// The row owning the list.
    #[inline]
    pub const fn owner(&self) -> Row<'tx, K> {
        Row::new(self.tx, self.table, self.obj)
    }

    /// The column holding the list.
    #[inline]
    pub const fn column(&self) -> ColKey {
        self.col
    }

    /// The transaction this handle is bound to.
    #[inline]
    pub const fn tx(&self) -> &'tx Tx<K> {
        self.tx
    }

    fn with<R>(&self, f: impl FnOnce(&Snapshot, &[ObjKey]) -> StoreResult<R>) -> StoreResult<R> {
        self.tx.read(|s| f(s, s.table_checked(self.table)?.list(self.obj, self.col)?))
    }

    /// Returns `true` if the owning row still exists.
    pub fn is_valid(&self) -> bool {
        self.with(|_, _| Ok(())).is_ok()
    }

    /// The linked keys, in list order.
    pub fn keys(&self) -> StoreResult<Vec<ObjKey>> {
        self.with(|_, keys| Ok(keys.to_vec()))
    }

    /// Number of links.
    pub fn len(&self) -> StoreResult<usize> {
        self.with(|_, keys| Ok(keys.len()))
    }

    /// Returns `true` if the list holds no links.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// The table the list links into.
    pub fn target_table(&self) -> StoreResult<TableRef<'tx, K>> {
        let target = self.tx.read(|s| {
            let column = s.table_checked(self.table)?.list_column(self.col)?;
            column.target.ok_or_else(|| StoreError::LinkTargetMismatch(column.name.clone()))
        })?;
        Ok(TableRef::new(self.tx, target))
    }

    /// The linked row at `index`.
    pub fn get(&self, index: usize) -> StoreResult<Row<'tx, K>> {
        let target = self.target_table()?.key();
        let obj = self.with(|_, keys| {
            keys.get(index).copied().ok_or(StoreError::IndexOutOfBounds { index, len: keys.len() })
        })?;
        Ok(Row::new(self.tx, target, obj))
    }

    /// Position of the first link to `obj`.
    pub fn find(&self, obj: ObjKey) -> StoreResult<Option<usize>> {
        self.with(|_, keys| Ok(keys.iter().position(|k| *k == obj)))
    }

    /// Exports the list for import into another transaction.
    pub fn export_for_handover(&self) -> StoreResult<LinkListTicket> {
        self.with(|_, _| Ok(()))?;
        let target = LinkListTarget { table: self.table, obj: self.obj, col: self.col };
        Ok(Ticket::new(self.tx.pin()?, target))
    }
}

impl<K: WriteMarker> LinkList<'_, K> {
    /// Appends a link to `obj`.
    pub fn add(&self, obj: ObjKey) -> StoreResult<()> {
        self.tx.write(|s| s.list_insert(self.table, self.obj, self.col, None, obj))
    }

    /// Inserts a link to `obj` at `index`.
    pub fn insert(&self, index: usize, obj: ObjKey) -> StoreResult<()> {
        self.tx.write(|s| s.list_insert(self.table, self.obj, self.col, Some(index), obj))
    }

    /// Removes the link at `index`, returning the key it pointed at. The
    /// linked row is not removed.
    pub fn remove(&self, index: usize) -> StoreResult<ObjKey> {
        self.tx.write(|s| s.list_remove(self.table, self.obj, self.col, index))
    }

    /// Removes every link.
    pub fn remove_all(&self) -> StoreResult<()> {
        self.tx.write(|s| s.list_clear(self.table, self.obj, self.col))
    }
}

#[cfg(test)]
mod test {
    use crate::{Environment, PropertyFlags, PropertyType, StoreError};

    #[test]
    fn edit_and_strip() {
        let env = Environment::builder().open();
        let txn = env.begin_rw_txn();
        let items = txn.create_table("items").unwrap();
        let lists = txn.create_table("lists").unwrap();
        let col = txn
            .add_column(
                "lists",
                "items",
                PropertyType::Array,
                PropertyFlags::empty(),
                Some("items"),
            )
            .unwrap();

        let a = items.add_empty_row().unwrap().key();
        let b = items.add_empty_row().unwrap().key();
        let list = lists.add_empty_row().unwrap().link_list(col).unwrap();

        list.add(a).unwrap();
        list.add(b).unwrap();
        list.insert(0, b).unwrap();
        assert_eq!(list.keys().unwrap(), vec![b, a, b]);
        assert_eq!(list.get(1).unwrap().key(), a);
        assert_eq!(list.find(b).unwrap(), Some(0));

        assert_eq!(list.remove(0).unwrap(), b);
        items.remove(b).unwrap();
        assert_eq!(list.keys().unwrap(), vec![a]);

        assert_eq!(
            list.insert(5, a).unwrap_err(),
            StoreError::IndexOutOfBounds { index: 5, len: 1 }
        );
        list.remove_all().unwrap();
        assert!(list.is_empty().unwrap());
    }
}
