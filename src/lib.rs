//! Thread handover for snapshot-bound database accessors.
//!
//! # Overview
//!
//! This crate provides an in-memory, multi-version object store whose
//! accessors (rows, link lists, queries, table views, and the higher-level
//! [`Object`], [`List`] and [`Results`]) are bound to the transaction, and
//! therefore the thread, that created them. Moving such an accessor to
//! another thread goes through a handover:
//!
//! 1. Wrap the accessor in a [`ThreadConfined`] value.
//! 2. Export it. The resulting [`Handover`] pins the exporting snapshot and
//!    is `Send + 'static`.
//! 3. Deliver the handover by any means (channel, queue, join handle).
//! 4. Import it into a transaction on the receiving thread. The transaction
//!    must read the exporting snapshot or a newer one.
//!
//! An envelope is consumed by import, so it can never be imported twice.
//! Dropping it unimported releases the pinned snapshot.
//!
//! # Quick Start
//!
//! ```
//! use signet_handover::{
//!     Environment, Object, ObjectSchema, Property, PropertyType, Schema, ThreadConfined,
//! };
//!
//! let env = Environment::builder().set_name("quick-start").open();
//!
//! let txn = env.begin_rw_txn();
//! let person = ObjectSchema::new(
//!     "person",
//!     [Property::new("name", PropertyType::String), Property::new("age", PropertyType::Int)],
//! );
//! txn.update_schema(&Schema::new([person])).unwrap();
//! let key = {
//!     let ada = Object::create(&txn, "person").unwrap();
//!     ada.set("name", "Ada").unwrap();
//!     ada.row().key()
//! };
//! txn.commit();
//!
//! let txn = env.begin_ro_txn();
//! let ada = Object::from_key(&txn, "person", key).unwrap();
//! let handover = ThreadConfined::from(ada).export_for_handover().unwrap();
//!
//! let writer = {
//!     let env = env.clone();
//!     std::thread::spawn(move || {
//!         let txn = env.begin_rw_txn();
//!         let ada = handover.import_from_handover(&txn).unwrap();
//!         ada.get_object().set("age", 36i64).unwrap();
//!         drop(ada);
//!         txn.commit()
//!     })
//! };
//! assert_eq!(writer.join().unwrap(), 2);
//!
//! let txn = env.begin_ro_txn();
//! let ada = Object::from_key(&txn, "person", key).unwrap();
//! assert_eq!(ada.get_as::<i64>("age").unwrap(), 36);
//! ```
//!
//! # Key Concepts
//!
//! - [`Environment`] - The database. Created via [`Environment::builder()`].
//!   Every commit publishes a new immutable snapshot with a version one
//!   higher than the last.
//! - [`Tx`] - A transaction reading one snapshot. [`RoTx`] transactions may
//!   be [refreshed](Tx::refresh) to the latest snapshot; a [`RwTx`] holds
//!   the environment's single writer slot until it commits or drops.
//! - [`Ro`] and [`Rw`] - Marker types indicating read-only or read-write
//!   transactions.
//! - [`TableRef`], [`Row`], [`LinkList`], [`Query`], [`TableView`] -
//!   Low-level accessors. Each exports its own [`Ticket`].
//! - [`Object`], [`List`], [`Results`] - High-level accessors, moved
//!   between threads as a [`ThreadConfined`] value.
//!
//! # Errors
//!
//! Every fallible operation returns a [`StoreResult`]. Handover failures
//! are [`StoreError::HandoverVersionIncompatible`] (the importing
//! transaction reads an older snapshot) and
//! [`StoreError::HandoverTargetGone`] (the exported row, list or table was
//! removed). Calling the wrong typed getter on a [`ThreadConfined`] value
//! is a bug and panics.
//!
//! # Imports
//!
//! For most use cases, import from the crate root:
//! ```rust,ignore
//! use signet_handover::{Environment, Object, ThreadConfined, StoreResult};
//! ```
//!
//! For advanced usage, import from submodules:
//! - [`tx`] - Transaction type aliases, kinds and tickets
//! - [`accessor`] - Accessor types and query building blocks
//! - [`handover`] - The thread-confined value and its envelope

#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    clippy::missing_const_for_fn,
    rustdoc::all
)]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![deny(unused_must_use, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod accessor;
pub use accessor::{
    CompareOp, Condition, LinkList, List, Object, Query, Results, Row, SortClause,
    SortDescriptor, TableRef, TableView,
};

pub mod entries;
pub use entries::{CellValue, Value};

mod error;
pub use error::{HandoverTarget, StoreError, StoreResult};

mod flags;
pub use flags::PropertyFlags;

pub mod handover;
pub use handover::{Handover, HandoverPackage, ThreadConfined, ThreadConfinedType};

mod schema;
pub use schema::{ObjectSchema, Property, PropertyType, Schema};

pub mod sys;
pub use sys::{Environment, EnvironmentBuilder, Info};

pub mod tx;
pub use tx::{
    ColKey, LinkListTicket, ObjKey, QueryTicket, Ro, RowTicket, Rw, TableKey, TableTicket,
    TableViewTicket, Ticket, TransactionKind, Tx, WriteMarker,
    aliases::{RoTx, RwTx},
};

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Arc;

    fn people() -> (Environment, ObjKey) {
        let env = Environment::builder().open();
        let txn = env.begin_rw_txn();
        txn.update_schema(&Schema::new([ObjectSchema::new(
            "person",
            [Property::new("name", PropertyType::String)],
        )]))
        .unwrap();
        let key = Object::create(&txn, "person").unwrap().row().key();
        txn.commit();
        (env, key)
    }

    #[test]
    fn handover_keeps_schema_pointer() {
        let (env, key) = people();
        let txn = env.begin_ro_txn();
        let object = Object::from_key(&txn, "person", key).unwrap();
        let schema = Arc::clone(object.object_schema());
        let handover = ThreadConfined::from(object).export_for_handover().unwrap();
        assert_eq!(handover.get_type(), ThreadConfinedType::Object);

        let imported = handover.import_from_handover(&txn).unwrap();
        assert!(Arc::ptr_eq(imported.get_object().object_schema(), &schema));
        assert_eq!(imported.get_object().row().key(), key);
    }

    #[test]
    fn foreign_environment_is_rejected() {
        let (env, key) = people();
        let (other, _) = people();
        let txn = env.begin_ro_txn();
        let handover = ThreadConfined::from(Object::from_key(&txn, "person", key).unwrap())
            .export_for_handover()
            .unwrap();

        let foreign = other.begin_ro_txn();
        assert_eq!(
            handover.import_from_handover(&foreign).unwrap_err(),
            StoreError::HandoverEnvironmentMismatch
        );
        assert_eq!(env.info().pinned_tickets(), 0);
    }
}
