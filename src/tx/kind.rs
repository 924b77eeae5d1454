use crate::Environment;
use core::{fmt, marker::PhantomData};
use parking_lot::{ArcMutexGuard, RawMutex};

mod private {
    pub trait Sealed {}
    impl Sealed for super::Ro {}
    impl Sealed for super::Rw {}
}

/// Marker type for read-only transactions.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub struct Ro;

/// Marker type for read-write transactions.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub struct Rw;

/// Exclusive ownership of the environment's single writer slot.
///
/// Held for the lifetime of a write transaction. Pinned to the thread that
/// acquired it.
pub struct WriterGuard {
    _guard: ArcMutexGuard<RawMutex, ()>,
    _unsend: PhantomData<*const ()>,
}

impl fmt::Debug for WriterGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterGuard").finish_non_exhaustive()
    }
}

/// Marker trait for transaction kinds.
///
/// The `Guard` associated type is what the transaction holds for its
/// lifetime:
/// - For [`Ro`]: nothing
/// - For [`Rw`]: a [`WriterGuard`], serializing writers
pub trait TransactionKind: private::Sealed + fmt::Debug + 'static {
    /// Whether transactions of this kind reject writes.
    const IS_READ_ONLY: bool = true;

    /// State held by the transaction for its lifetime.
    type Guard: fmt::Debug;

    /// Acquire the guard for a new transaction of this kind, blocking if
    /// necessary.
    #[doc(hidden)]
    fn acquire(env: &Environment) -> Self::Guard;

    /// Create a new tracing span for this transaction kind.
    #[doc(hidden)]
    fn new_span(env: &str, version: u64) -> tracing::Span {
        tracing::debug_span!(
            target: "handover",
            "txn",
            env = %env,
            kind = %if Self::IS_READ_ONLY { "ro" } else { "rw" },
            version = version,
        )
    }
}

impl TransactionKind for Ro {
    type Guard = ();

    fn acquire(_env: &Environment) -> Self::Guard {}
}

impl TransactionKind for Rw {
    const IS_READ_ONLY: bool = false;

    type Guard = WriterGuard;

    fn acquire(env: &Environment) -> Self::Guard {
        let writer = env.writer();
        let guard = match writer.try_lock_arc() {
            Some(guard) => guard,
            None => {
                tracing::trace!(
                    target: "handover",
                    env = %env.name(),
                    "Write transaction already open, blocking..."
                );
                writer.lock_arc()
            }
        };
        WriterGuard { _guard: guard, _unsend: PhantomData }
    }
}

/// Marker trait for writable transaction kinds.
///
/// Primarily used for writing bounds of the form
/// `K: TransactionKind + WriteMarker`.
pub trait WriteMarker: TransactionKind {}

impl WriteMarker for Rw {}
