//! Public type aliases for transactions.

use crate::{Ro, Rw, tx::r#impl::Tx};

/// A read-only transaction.
pub type RoTx = Tx<Ro>;

/// A read-write transaction.
pub type RwTx = Tx<Rw>;
