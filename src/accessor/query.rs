use crate::{
    ColKey, ObjKey, QueryTicket, SortDescriptor, StoreResult, TableRef, TableView,
    TransactionKind, Tx, Value,
    tx::{QueryTarget, Ticket},
};
use core::{fmt, mem};
use std::cmp::Ordering;

/// Comparison applied by a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
}

/// A single filter on one scalar column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Condition {
    /// Column to test.
    pub column: ColKey,
    /// Comparison.
    pub op: CompareOp,
    /// Right-hand operand.
    pub value: Value,
}

impl Condition {
    /// Tests a cell value against the condition.
    ///
    /// Equality compares across types. Ordering comparisons only match
    /// non-null values of the same type.
    pub fn matches(&self, value: &Value) -> bool {
        let ordered = || {
            (!value.is_null() && mem::discriminant(value) == mem::discriminant(&self.value))
                .then(|| value.cmp(&self.value))
        };
        match self.op {
            CompareOp::Equal => *value == self.value,
            CompareOp::NotEqual => *value != self.value,
            CompareOp::Greater => ordered().is_some_and(Ordering::is_gt),
            CompareOp::GreaterEqual => ordered().is_some_and(Ordering::is_ge),
            CompareOp::Less => ordered().is_some_and(Ordering::is_lt),
            CompareOp::LessEqual => ordered().is_some_and(Ordering::is_le),
        }
    }
}

/// A conjunction of conditions over one table, bound to a transaction.
///
/// A query is a description; it is evaluated on every [`Query::count`] or
/// [`Query::find_all`].
pub struct Query<'tx, K: TransactionKind> {
    table: TableRef<'tx, K>,
    conditions: Vec<Condition>,
}

impl<K: TransactionKind> Clone for Query<'_, K> {
    fn clone(&self) -> Self {
        Self { table: self.table, conditions: self.conditions.clone() }
    }
}

impl<K: TransactionKind> fmt::Debug for Query<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("table", &self.table.key())
            .field("conditions", &self.conditions)
            .finish()
    }
}

impl<'tx, K: TransactionKind> Query<'tx, K> {
    pub(crate) const fn new(table: TableRef<'tx, K>) -> Self {
        Self::from_parts(table, Vec::new())
    }

    pub(crate) const fn from_parts(table: TableRef<'tx, K>, conditions: Vec<Condition>) -> Self {
        Self { table, conditions }
    }

    /// The queried table.
    #[inline]
    pub const fn table(&self) -> TableRef<'tx, K> {
        self.table
    }

    /// The transaction this query is bound to.
    #[inline]
    pub const fn tx(&self) -> &'tx Tx<K> {
        self.table.tx()
    }

    /// The query's conditions, in the order they were added.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Adds a condition.
    pub fn filter(
        mut self,
        column: impl Into<ColKey>,
        op: CompareOp,
        value: impl Into<Value>,
    ) -> Self {
        self.conditions.push(Condition { column: column.into(), op, value: value.into() });
        self
    }

    /// Adds `column == value`.
    pub fn equal(self, column: impl Into<ColKey>, value: impl Into<Value>) -> Self {
        self.filter(column, CompareOp::Equal, value)
    }

    /// Adds `column != value`.
    pub fn not_equal(self, column: impl Into<ColKey>, value: impl Into<Value>) -> Self {
        self.filter(column, CompareOp::NotEqual, value)
    }

    /// Adds `column > value`.
    pub fn greater(self, column: impl Into<ColKey>, value: impl Into<Value>) -> Self {
        self.filter(column, CompareOp::Greater, value)
    }

    /// Adds `column >= value`.
    pub fn greater_equal(self, column: impl Into<ColKey>, value: impl Into<Value>) -> Self {
        self.filter(column, CompareOp::GreaterEqual, value)
    }

    /// Adds `column < value`.
    pub fn less(self, column: impl Into<ColKey>, value: impl Into<Value>) -> Self {
        self.filter(column, CompareOp::Less, value)
    }

    /// Adds `column <= value`.
    pub fn less_equal(self, column: impl Into<ColKey>, value: impl Into<Value>) -> Self {
        self.filter(column, CompareOp::LessEqual, value)
    }

    /// Evaluates the query against the transaction's snapshot.
    pub(crate) fn evaluate(&self, sort: &SortDescriptor) -> StoreResult<Vec<ObjKey>> {
        self.tx().read(|s| {
            let table = s.table_checked(self.table.key())?;
            for condition in &self.conditions {
                table.scalar_column(condition.column)?;
            }
            let mut keys: Vec<ObjKey> = table
                .keys()
                .filter(|&obj| {
                    self.conditions
                        .iter()
                        .all(|c| table.value_ref(obj, c.column).is_some_and(|v| c.matches(v)))
                })
                .collect();
            sort.apply(table, &mut keys)?;
            Ok(keys)
        })
    }

    /// Number of matching rows.
    pub fn count(&self) -> StoreResult<usize> {
        self.evaluate(&SortDescriptor::new()).map(|keys| keys.len())
    }

    /// Evaluates the query into a sorted view.
    pub fn find_all(&self, sort: SortDescriptor) -> StoreResult<TableView<'tx, K>> {
        TableView::new(self.clone(), sort)
    }

    pub(crate) fn target(&self) -> StoreResult<QueryTarget> {
        self.tx().read(|s| s.table_checked(self.table.key()).map(drop))?;
        Ok(QueryTarget { table: self.table.key(), conditions: self.conditions.clone() })
    }

    /// Exports the query for import into another transaction. The conditions
    /// are copied; the query is re-evaluated in the importing transaction.
    pub fn export_for_handover(&self) -> StoreResult<QueryTicket> {
        let target = self.target()?;
        Ok(Ticket::new(self.tx().pin()?, target))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Environment, ObjKey, PropertyFlags, PropertyType};

    #[test]
    fn ordering_needs_matching_types() {
        let int = Condition { column: ColKey(0), op: CompareOp::Greater, value: Value::Int(1) };
        assert!(int.matches(&Value::Int(2)));
        assert!(!int.matches(&Value::Int(1)));
        assert!(!int.matches(&Value::String("9".into())));
        assert!(!int.matches(&Value::Null));

        let null = Condition { column: ColKey(0), op: CompareOp::LessEqual, value: Value::Null };
        assert!(!null.matches(&Value::Null));

        let ne = Condition { column: ColKey(0), op: CompareOp::NotEqual, value: Value::Null };
        assert!(ne.matches(&Value::Link(ObjKey(0))));
        assert!(!ne.matches(&Value::Null));
    }

    #[test]
    fn conditions_are_conjunctive() {
        let env = Environment::builder().open();
        let txn = env.begin_rw_txn();
        let table = txn.create_table("t").unwrap();
        let n = txn.add_column("t", "n", PropertyType::Int, PropertyFlags::empty(), None).unwrap();
        for value in 0..10i64 {
            table.add_empty_row().unwrap().set(n, value).unwrap();
        }

        let query = table.where_().greater_equal(n, 3i64).less(n, 7i64).not_equal(n, 5i64);
        assert_eq!(query.count().unwrap(), 3);
        assert_eq!(query.conditions().len(), 3);

        let view = query.find_all(SortDescriptor::by(n, false)).unwrap();
        let values: Vec<i64> =
            (0..view.len()).map(|i| view.get(i).unwrap().get_as(n).unwrap()).collect();
        assert_eq!(values, vec![6, 4, 3]);
    }
}
