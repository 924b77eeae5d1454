use crate::{Query, Row, SortDescriptor, StoreError, StoreResult, TableView, TransactionKind, Tx};
use core::fmt;

/// A live, sorted query result.
///
/// Unlike a [`TableView`], results hold no keys; every read re-evaluates the
/// query against the transaction's current view.
pub struct Results<'tx, K: TransactionKind> {
    query: Query<'tx, K>,
    sort: SortDescriptor,
}

impl<K: TransactionKind> Clone for Results<'_, K> {
    fn clone(&self) -> Self {
        Self { query: self.query.clone(), sort: self.sort.clone() }
    }
}

impl<K: TransactionKind> fmt::Debug for Results<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Results").field("query", &self.query).field("sort", &self.sort).finish()
    }
}

impl<'tx, K: TransactionKind> Results<'tx, K> {
    /// Unsorted results of `query`.
    pub const fn new(query: Query<'tx, K>) -> Self {
        Self::with_sort(query, SortDescriptor::new())
    }

    /// Sorted results of `query`.
    pub const fn with_sort(query: Query<'tx, K>, sort: SortDescriptor) -> Self {
        Self { query, sort }
    }

    /// The same query under a different sort order.
    pub fn sort(&self, sort: SortDescriptor) -> Self {
        Self::with_sort(self.query.clone(), sort)
    }

    /// The sort order.
    pub const fn get_sort(&self) -> &SortDescriptor {
        &self.sort
    }

    /// The underlying query.
    pub const fn get_query(&self) -> &Query<'tx, K> {
        &self.query
    }

    /// The transaction these results are bound to.
    pub const fn tx(&self) -> &'tx Tx<K> {
        self.query.tx()
    }

    /// Number of matching rows.
    pub fn len(&self) -> StoreResult<usize> {
        self.query.count()
    }

    /// Returns `true` if no rows match.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// The row at `index` in sort order.
    pub fn get(&self, index: usize) -> StoreResult<Row<'tx, K>> {
        let keys = self.query.evaluate(&self.sort)?;
        let obj = *keys.get(index).ok_or(StoreError::IndexOutOfBounds { index, len: keys.len() })?;
        Ok(Row::new(self.tx(), self.query.table().key(), obj))
    }

    /// All matching rows in sort order.
    pub fn rows(&self) -> StoreResult<Vec<Row<'tx, K>>> {
        let table = self.query.table().key();
        let keys = self.query.evaluate(&self.sort)?;
        Ok(keys.into_iter().map(|obj| Row::new(self.tx(), table, obj)).collect())
    }

    /// Materializes the current results.
    pub fn snapshot(&self) -> StoreResult<TableView<'tx, K>> {
        self.query.find_all(self.sort.clone())
    }
}

#[cfg(test)]
mod test {
    use crate::{Environment, PropertyFlags, PropertyType, Results, SortDescriptor};

    #[test]
    fn results_follow_writes() {
        let env = Environment::builder().open();
        let txn = env.begin_rw_txn();
        let table = txn.create_table("t").unwrap();
        let n = txn.add_column("t", "n", PropertyType::Int, PropertyFlags::empty(), None).unwrap();
        table.add_empty_row().unwrap().set(n, 2i64).unwrap();

        let results =
            Results::new(table.where_().greater(n, 0i64)).sort(SortDescriptor::by(n, true));
        let snapshot = results.snapshot().unwrap();
        table.add_empty_row().unwrap().set(n, 1i64).unwrap();

        assert_eq!(results.len().unwrap(), 2);
        assert_eq!(results.get(0).unwrap().get_as::<i64>(n).unwrap(), 1);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(results.rows().unwrap().len(), 2);
    }
}
