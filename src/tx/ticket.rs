//! Version-pinned tickets for moving accessors between transactions.
//!
//! A [`Ticket`] is produced by an accessor's `export_for_handover` and
//! consumed by its `import`. It holds a pin on the exporting snapshot until
//! it is imported or dropped. Tickets carry stable keys only and are
//! therefore `Send + 'static`.

use crate::{
    ColKey, HandoverTarget, LinkList, ObjKey, Query, Row, SortDescriptor, StoreError, StoreResult,
    TableKey, TableRef, TableView, TransactionKind, Tx, accessor::Condition,
    sys::pins::VersionPin,
};

/// Identifies a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableTarget {
    pub(crate) table: TableKey,
}

/// Identifies a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowTarget {
    pub(crate) table: TableKey,
    pub(crate) obj: ObjKey,
}

/// Identifies a link list by its owning row and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkListTarget {
    pub(crate) table: TableKey,
    pub(crate) obj: ObjKey,
    pub(crate) col: ColKey,
}

/// A copy of a query's table and conditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTarget {
    pub(crate) table: TableKey,
    pub(crate) conditions: Vec<Condition>,
}

/// A copy of a table view's query and sort order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableViewTarget {
    pub(crate) query: QueryTarget,
    pub(crate) sort: SortDescriptor,
}

/// A one-shot ticket for importing an accessor into another transaction.
///
/// Dropping the ticket cancels the handover and releases its pin.
#[derive(Debug)]
#[must_use = "dropping a ticket cancels the handover"]
pub struct Ticket<T> {
    pin: VersionPin,
    target: T,
}

/// Ticket for a [`TableRef`].
pub type TableTicket = Ticket<TableTarget>;
/// Ticket for a [`Row`].
pub type RowTicket = Ticket<RowTarget>;
/// Ticket for a [`LinkList`].
pub type LinkListTicket = Ticket<LinkListTarget>;
/// Ticket for a [`Query`].
pub type QueryTicket = Ticket<QueryTarget>;
/// Ticket for a [`TableView`].
pub type TableViewTicket = Ticket<TableViewTarget>;

impl<T> Ticket<T> {
    pub(crate) const fn new(pin: VersionPin, target: T) -> Self {
        Self { pin, target }
    }

    /// Version of the snapshot the ticket was exported from.
    pub fn version(&self) -> u64 {
        self.pin.version()
    }

    /// The exported identity.
    pub const fn target(&self) -> &T {
        &self.target
    }

    /// Consumes the ticket after checking that `tx` may import it. The pin
    /// is released when this returns.
    fn redeem<K: TransactionKind>(self, tx: &Tx<K>) -> StoreResult<T> {
        if !self.pin.env().ptr_eq(tx.env()) {
            return Err(StoreError::HandoverEnvironmentMismatch);
        }
        tx.check_version(self.pin.version())?;
        Ok(self.target)
    }
}

const fn gone(target: HandoverTarget) -> StoreError {
    StoreError::HandoverTargetGone(target)
}

impl TableTicket {
    /// Rebinds the table to `tx`.
    pub fn import<K: TransactionKind>(self, tx: &Tx<K>) -> StoreResult<TableRef<'_, K>> {
        let TableTarget { table } = self.redeem(tx)?;
        if tx.read(|s| s.table(table).is_none()) {
            return Err(gone(HandoverTarget::Table));
        }
        Ok(TableRef::new(tx, table))
    }
}

impl RowTicket {
    /// Rebinds the row to `tx`.
    ///
    /// Consumes the ticket; importing it again does not compile:
    ///
    /// ```compile_fail,E0382
    /// use signet_handover::Environment;
    ///
    /// let env = Environment::builder().open();
    /// let txn = env.begin_rw_txn();
    /// let table = txn.create_table("t").unwrap();
    /// let key = table.add_empty_row().unwrap().key();
    /// txn.commit();
    ///
    /// let txn = env.begin_ro_txn();
    /// let ticket = txn.open_table("t").unwrap().get(key).unwrap().export_for_handover().unwrap();
    /// let first = ticket.import(&txn).unwrap();
    /// let second = ticket.import(&txn).unwrap();
    /// ```
    pub fn import<K: TransactionKind>(self, tx: &Tx<K>) -> StoreResult<Row<'_, K>> {
        let RowTarget { table, obj } = self.redeem(tx)?;
        if !tx.read(|s| s.table(table).is_some_and(|t| t.contains(obj))) {
            return Err(gone(HandoverTarget::Row));
        }
        Ok(Row::new(tx, table, obj))
    }
}

impl LinkListTicket {
    /// Rebinds the link list to `tx`.
    pub fn import<K: TransactionKind>(self, tx: &Tx<K>) -> StoreResult<LinkList<'_, K>> {
        let LinkListTarget { table, obj, col } = self.redeem(tx)?;
        if !tx.read(|s| s.table(table).is_some_and(|t| t.list(obj, col).is_ok())) {
            return Err(gone(HandoverTarget::LinkList));
        }
        Ok(LinkList::new(tx, table, obj, col))
    }
}

impl QueryTicket {
    /// Rebinds the query to `tx`. Conditions are carried over unchanged.
    pub fn import<K: TransactionKind>(self, tx: &Tx<K>) -> StoreResult<Query<'_, K>> {
        let target = self.redeem(tx)?;
        import_query(tx, target)
    }
}

impl TableViewTicket {
    /// Rebinds the view to `tx`, re-evaluating it against `tx`'s snapshot.
    pub fn import<K: TransactionKind>(self, tx: &Tx<K>) -> StoreResult<TableView<'_, K>> {
        let TableViewTarget { query, sort } = self.redeem(tx)?;
        import_query(tx, query)?.find_all(sort)
    }
}

fn import_query<K: TransactionKind>(tx: &Tx<K>, target: QueryTarget) -> StoreResult<Query<'_, K>> {
    let QueryTarget { table, conditions } = target;
    if tx.read(|s| s.table(table).is_none()) {
        return Err(gone(HandoverTarget::Table));
    }
    Ok(Query::from_parts(TableRef::new(tx, table), conditions))
}
