//! Transactions and handover tickets.
//!
//! # Core Types (re-exported at crate root)
//!
//! - [`Tx`] - A transaction bound to one snapshot
//! - [`Ro`], [`Rw`] - Transaction kind markers
//! - [`TableKey`], [`ObjKey`], [`ColKey`] - Stable identities
//! - [`Ticket`] - A version-pinned, one-shot handover ticket
//!
//! # Type Aliases
//!
//! - [`aliases::RoTx`], [`aliases::RwTx`] - Read-only and read-write
//!   transactions
//!
//! # Advanced: Writing Generic Code
//!
//! For users writing generic code over transactions, we recommend reviewing
//! the [`TransactionKind`] and [`WriteMarker`] traits, as well as the bounds
//! on impl blocks for the accessor types.

pub mod aliases;

mod cache;

mod keys;
pub use keys::{ColKey, ObjKey, TableKey};

mod kind;
pub use kind::{Ro, Rw, TransactionKind, WriteMarker, WriterGuard};

mod r#impl;
pub use r#impl::Tx;

mod ticket;
pub use ticket::{
    LinkListTarget, LinkListTicket, QueryTarget, QueryTicket, RowTarget, RowTicket,
    TableTarget, TableTicket, TableViewTarget, TableViewTicket, Ticket,
};
