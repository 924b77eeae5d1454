use crate::{
    ObjKey, Query, Row, SortDescriptor, StoreError, StoreResult, TableViewTicket,
    TransactionKind, Tx,
    tx::{TableViewTarget, Ticket},
};
use core::fmt;

/// The materialized, sorted result of a [`Query`].
///
/// A view holds the matching keys as of its last evaluation. Call
/// [`TableView::sync`] to re-evaluate it after writes in the same
/// transaction.
pub struct TableView<'tx, K: TransactionKind> {
    query: Query<'tx, K>,
    sort: SortDescriptor,
    keys: Vec<ObjKey>,
}

impl<K: TransactionKind> Clone for TableView<'_, K> {
    fn clone(&self) -> Self {
        Self { query: self.query.clone(), sort: self.sort.clone(), keys: self.keys.clone() }
    }
}

impl<K: TransactionKind> fmt::Debug for TableView<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableView")
            .field("query", &self.query)
            .field("sort", &self.sort)
            .field("len", &self.keys.len())
            .finish()
    }
}

impl<'tx, K: TransactionKind> TableView<'tx, K> {
    pub(crate) fn new(query: Query<'tx, K>, sort: SortDescriptor) -> StoreResult<Self> {
        let keys = query.evaluate(&sort)?;
        Ok(Self { query, sort, keys })
    }

    /// The query the view was built from.
    pub const fn query(&self) -> &Query<'tx, K> {
        &self.query
    }

    /// The view's sort order.
    pub const fn sort(&self) -> &SortDescriptor {
        &self.sort
    }

    /// The transaction this view is bound to.
    pub const fn tx(&self) -> &'tx Tx<K> {
        self.query.tx()
    }

    /// Matching keys, in view order.
    pub fn keys(&self) -> &[ObjKey] {
        &self.keys
    }

    /// Number of rows in the view.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if the view holds no rows.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The row at `index`.
    ///
    /// Fails with [`StoreError::NoSuchObject`] if the row was removed since
    /// the view was last synced.
    pub fn get(&self, index: usize) -> StoreResult<Row<'tx, K>> {
        let obj = *self
            .keys
            .get(index)
            .ok_or(StoreError::IndexOutOfBounds { index, len: self.keys.len() })?;
        let row = Row::new(self.tx(), self.query.table().key(), obj);
        if !row.is_valid() {
            return Err(StoreError::NoSuchObject(obj));
        }
        Ok(row)
    }

    /// Re-evaluates the view.
    pub fn sync(&mut self) -> StoreResult<()> {
        self.keys = self.query.evaluate(&self.sort)?;
        Ok(())
    }

    /// Exports the view for import into another transaction. The importing
    /// transaction re-evaluates it against its own snapshot.
    pub fn export_for_handover(&self) -> StoreResult<TableViewTicket> {
        let target = TableViewTarget { query: self.query.target()?, sort: self.sort.clone() };
        Ok(Ticket::new(self.tx().pin()?, target))
    }
}

#[cfg(test)]
mod test {
    use crate::{Environment, PropertyFlags, PropertyType, SortDescriptor, StoreError};

    #[test]
    fn view_is_stale_until_synced() {
        let env = Environment::builder().open();
        let txn = env.begin_rw_txn();
        let table = txn.create_table("t").unwrap();
        let n = txn.add_column("t", "n", PropertyType::Int, PropertyFlags::empty(), None).unwrap();
        let first = table.add_empty_row().unwrap();

        let mut view = table.where_().find_all(SortDescriptor::new()).unwrap();
        table.add_empty_row().unwrap().set(n, 1i64).unwrap();
        first.remove().unwrap();

        assert_eq!(view.len(), 1);
        assert_eq!(view.get(0).unwrap_err(), StoreError::NoSuchObject(first.key()));

        view.sync().unwrap();
        assert_eq!(view.len(), 1);
        assert_eq!(view.get(0).unwrap().get_as::<i64>(n).unwrap(), 1);
    }
}
