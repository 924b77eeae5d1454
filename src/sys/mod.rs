//! Environment internals.
//!
//! # Core Types (re-exported at crate root)
//!
//! - [`Environment`] - A shared handle to one in-memory database
//! - [`EnvironmentBuilder`] - Configuration for opening an environment
//! - [`Info`] - Latest version and outstanding handover tickets
//!
//! Committed snapshots and the handover pin registry live here too, but are
//! only reachable through transactions and tickets.

mod environment;
pub use environment::{Environment, EnvironmentBuilder, Info};

pub(crate) mod pins;

pub(crate) mod snapshot;
