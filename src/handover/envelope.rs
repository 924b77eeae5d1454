use crate::{
    LinkListTicket, List, Object, ObjectSchema, QueryTicket, Results, RowTicket, SortDescriptor,
    StoreResult, ThreadConfined, ThreadConfinedType, TransactionKind, Tx,
};
use std::sync::Arc;

/// Per-variant ticket and reconstruction metadata.
#[derive(Debug)]
pub(crate) enum Payload {
    Object { row: RowTicket, schema: Arc<ObjectSchema> },
    List { link_list: LinkListTicket },
    Results { query: QueryTicket, sort: SortDescriptor },
}

/// A one-shot envelope carrying a [`ThreadConfined`] value to another
/// thread.
///
/// The envelope is `Send + 'static` but not `Clone`, and
/// [`Handover::import_from_handover`] consumes it, so it is imported at most
/// once. Dropping it without importing cancels the handover and releases the
/// pinned snapshot.
///
/// ```
/// use signet_handover::{
///     Environment, Object, ObjectSchema, Property, PropertyType, Schema, ThreadConfined,
/// };
///
/// let env = Environment::builder().open();
/// let txn = env.begin_rw_txn();
/// let counter = ObjectSchema::new("counter", [Property::new("n", PropertyType::Int)]);
/// txn.update_schema(&Schema::new([counter])).unwrap();
/// Object::create(&txn, "counter").unwrap().set("n", 7i64).unwrap();
/// txn.commit();
///
/// let txn = env.begin_ro_txn();
/// let row = txn.open_table("class_counter").unwrap().row_at(0).unwrap();
/// let object = Object::new(txn.object_schema("counter").unwrap(), row).unwrap();
/// let handover = ThreadConfined::from(object).export_for_handover().unwrap();
///
/// let handle = std::thread::spawn(move || {
///     let txn = env.begin_ro_txn();
///     let value = handover.import_from_handover(&txn).unwrap();
///     value.get_object().get_as::<i64>("n").unwrap()
/// });
/// assert_eq!(handle.join().unwrap(), 7);
/// ```
#[derive(Debug)]
#[must_use = "dropping a handover cancels it"]
pub struct Handover {
    payload: Payload,
}

impl Handover {
    pub(crate) const fn new(payload: Payload) -> Self {
        Self { payload }
    }

    /// The variant the envelope carries.
    pub const fn get_type(&self) -> ThreadConfinedType {
        match self.payload {
            Payload::Object { .. } => ThreadConfinedType::Object,
            Payload::List { .. } => ThreadConfinedType::List,
            Payload::Results { .. } => ThreadConfinedType::Results,
        }
    }

    /// Version of the snapshot the value was exported from.
    pub fn version(&self) -> u64 {
        match &self.payload {
            Payload::Object { row, .. } => row.version(),
            Payload::List { link_list } => link_list.version(),
            Payload::Results { query, .. } => query.version(),
        }
    }

    /// Imports the value into `tx`, consuming the envelope.
    ///
    /// Fails with [`StoreError::HandoverVersionIncompatible`] if `tx` reads
    /// an older snapshot than the export, and with
    /// [`StoreError::HandoverTargetGone`] if the exported row, list or table
    /// no longer exists. Failure never waits for a newer version; the
    /// pinned snapshot is released either way.
    ///
    /// The envelope is moved into the call, so a second import does not
    /// compile:
    ///
    /// ```compile_fail,E0382
    /// use signet_handover::{Environment, Results, ThreadConfined};
    ///
    /// let env = Environment::builder().open();
    /// let txn = env.begin_rw_txn();
    /// txn.create_table("t").unwrap();
    /// txn.commit();
    ///
    /// let txn = env.begin_ro_txn();
    /// let results = Results::new(txn.open_table("t").unwrap().where_());
    /// let handover = ThreadConfined::from(results).export_for_handover().unwrap();
    /// let first = handover.import_from_handover(&txn).unwrap();
    /// let second = handover.import_from_handover(&txn).unwrap();
    /// ```
    ///
    /// [`StoreError::HandoverVersionIncompatible`]: crate::StoreError::HandoverVersionIncompatible
    /// [`StoreError::HandoverTargetGone`]: crate::StoreError::HandoverTargetGone
    pub fn import_from_handover<K: TransactionKind>(
        self,
        tx: &Tx<K>,
    ) -> StoreResult<ThreadConfined<'_, K>> {
        Ok(match self.payload {
            Payload::Object { row, schema } => {
                ThreadConfined::Object(Object::new_unchecked(schema, row.import(tx)?))
            }
            Payload::List { link_list } => ThreadConfined::List(List::new(link_list.import(tx)?)),
            Payload::Results { query, sort } => {
                ThreadConfined::Results(Results::with_sort(query.import(tx)?, sort))
            }
        })
    }
}
