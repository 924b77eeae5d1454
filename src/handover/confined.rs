use crate::{
    Handover, List, Object, Results, StoreResult, TransactionKind, Tx,
    handover::envelope::Payload,
};
use core::fmt;
use std::sync::Arc;

/// Which accessor a [`ThreadConfined`] or [`Handover`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThreadConfinedType {
    /// An [`Object`].
    Object,
    /// A [`List`].
    List,
    /// A [`Results`].
    Results,
}

impl fmt::Display for ThreadConfinedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Object => "object",
            Self::List => "list",
            Self::Results => "results",
        })
    }
}

/// One high-level accessor, bound to the transaction (and thread) that
/// produced it.
///
/// The value borrows its transaction, so it cannot leave the thread:
///
/// ```compile_fail
/// use signet_handover::{Environment, ThreadConfined};
///
/// fn assert_send<T: Send>(_: T) {}
///
/// fn check(value: ThreadConfined<'_, signet_handover::Ro>) {
///     assert_send(value);
/// }
/// ```
///
/// Use [`ThreadConfined::export_for_handover`] to obtain a [`Handover`]
/// that can.
pub enum ThreadConfined<'tx, K: TransactionKind> {
    /// An object.
    Object(Object<'tx, K>),
    /// A list.
    List(List<'tx, K>),
    /// A result set.
    Results(Results<'tx, K>),
}

impl<K: TransactionKind> Clone for ThreadConfined<'_, K> {
    fn clone(&self) -> Self {
        match self {
            Self::Object(object) => Self::Object(object.clone()),
            Self::List(list) => Self::List(*list),
            Self::Results(results) => Self::Results(results.clone()),
        }
    }
}

impl<K: TransactionKind> fmt::Debug for ThreadConfined<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object(object) => f.debug_tuple("Object").field(object).finish(),
            Self::List(list) => f.debug_tuple("List").field(list).finish(),
            Self::Results(results) => f.debug_tuple("Results").field(results).finish(),
        }
    }
}

impl<'tx, K: TransactionKind> From<Object<'tx, K>> for ThreadConfined<'tx, K> {
    fn from(object: Object<'tx, K>) -> Self {
        Self::Object(object)
    }
}

impl<'tx, K: TransactionKind> From<List<'tx, K>> for ThreadConfined<'tx, K> {
    fn from(list: List<'tx, K>) -> Self {
        Self::List(list)
    }
}

impl<'tx, K: TransactionKind> From<Results<'tx, K>> for ThreadConfined<'tx, K> {
    fn from(results: Results<'tx, K>) -> Self {
        Self::Results(results)
    }
}

#[cold]
#[track_caller]
fn tag_mismatch(expected: ThreadConfinedType, actual: ThreadConfinedType) -> ! {
    panic!("thread-confined value holds {actual}, not {expected}")
}

impl<'tx, K: TransactionKind> ThreadConfined<'tx, K> {
    /// The active variant.
    pub const fn get_type(&self) -> ThreadConfinedType {
        match self {
            Self::Object(_) => ThreadConfinedType::Object,
            Self::List(_) => ThreadConfinedType::List,
            Self::Results(_) => ThreadConfinedType::Results,
        }
    }

    /// The transaction the value is bound to.
    pub const fn tx(&self) -> &'tx Tx<K> {
        match self {
            Self::Object(object) => object.tx(),
            Self::List(list) => list.tx(),
            Self::Results(results) => results.tx(),
        }
    }

    /// The held object.
    ///
    /// # Panics
    ///
    /// If the value is not an object.
    #[track_caller]
    pub fn get_object(&self) -> &Object<'tx, K> {
        match self {
            Self::Object(object) => object,
            other => tag_mismatch(ThreadConfinedType::Object, other.get_type()),
        }
    }

    /// The held list.
    ///
    /// # Panics
    ///
    /// If the value is not a list.
    #[track_caller]
    pub fn get_list(&self) -> &List<'tx, K> {
        match self {
            Self::List(list) => list,
            other => tag_mismatch(ThreadConfinedType::List, other.get_type()),
        }
    }

    /// The held result set.
    ///
    /// # Panics
    ///
    /// If the value is not a result set.
    #[track_caller]
    pub fn get_results(&self) -> &Results<'tx, K> {
        match self {
            Self::Results(results) => results,
            other => tag_mismatch(ThreadConfinedType::Results, other.get_type()),
        }
    }

    /// The held object, if any.
    pub const fn as_object(&self) -> Option<&Object<'tx, K>> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// The held list, if any.
    pub const fn as_list(&self) -> Option<&List<'tx, K>> {
        match self {
            Self::List(list) => Some(list),
            _ => None,
        }
    }

    /// The held result set, if any.
    pub const fn as_results(&self) -> Option<&Results<'tx, K>> {
        match self {
            Self::Results(results) => Some(results),
            _ => None,
        }
    }

    /// Unwraps an object, returning the value unchanged on a tag mismatch.
    pub fn into_object(self) -> Result<Object<'tx, K>, Self> {
        match self {
            Self::Object(object) => Ok(object),
            other => Err(other),
        }
    }

    /// Unwraps a list, returning the value unchanged on a tag mismatch.
    pub fn into_list(self) -> Result<List<'tx, K>, Self> {
        match self {
            Self::List(list) => Ok(list),
            other => Err(other),
        }
    }

    /// Unwraps a result set, returning the value unchanged on a tag mismatch.
    pub fn into_results(self) -> Result<Results<'tx, K>, Self> {
        match self {
            Self::Results(results) => Ok(results),
            other => Err(other),
        }
    }

    /// Exports the value for import on another thread.
    ///
    /// The bound transaction must not hold uncommitted changes. The returned
    /// envelope pins the transaction's snapshot until it is imported or
    /// dropped.
    pub fn export_for_handover(&self) -> StoreResult<Handover> {
        let payload = match self {
            Self::Object(object) => Payload::Object {
                row: object.row().export_for_handover()?,
                schema: Arc::clone(object.object_schema()),
            },
            Self::List(list) => {
                Payload::List { link_list: list.link_list().export_for_handover()? }
            }
            Self::Results(results) => Payload::Results {
                query: results.get_query().export_for_handover()?,
                sort: results.get_sort().clone(),
            },
        };
        Ok(Handover::new(payload))
    }
}
