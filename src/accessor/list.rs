use crate::{LinkList, ObjKey, Row, StoreResult, TransactionKind, Tx, WriteMarker};
use core::fmt;

/// A link list viewed as a collection of objects.
pub struct List<'tx, K: TransactionKind> {
    link_list: LinkList<'tx, K>,
}

impl<K: TransactionKind> Clone for List<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: TransactionKind> Copy for List<'_, K> {}

impl<K: TransactionKind> fmt::Debug for List<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("List").field(&self.link_list).finish()
    }
}

impl<'tx, K: TransactionKind> List<'tx, K> {
    /// Wraps a link list.
    pub const fn new(link_list: LinkList<'tx, K>) -> Self {
        Self { link_list }
    }

    /// The underlying link list.
    #[inline]
    pub const fn link_list(&self) -> &LinkList<'tx, K> {
        &self.link_list
    }

    /// The transaction this list is bound to.
    #[inline]
    pub const fn tx(&self) -> &'tx Tx<K> {
        self.link_list.tx()
    }

    /// Returns `true` if the owning row still exists.
    pub fn is_valid(&self) -> bool {
        self.link_list.is_valid()
    }

    /// Number of elements.
    pub fn len(&self) -> StoreResult<usize> {
        self.link_list.len()
    }

    /// Returns `true` if the list holds no elements.
    pub fn is_empty(&self) -> StoreResult<bool> {
        self.link_list.is_empty()
    }

    /// The element at `index`.
    pub fn get(&self, index: usize) -> StoreResult<Row<'tx, K>> {
        self.link_list.get(index)
    }
}

impl<K: WriteMarker> List<'_, K> {
    /// Appends a link to `obj`.
    pub fn add(&self, obj: ObjKey) -> StoreResult<()> {
        self.link_list.add(obj)
    }

    /// Removes the link at `index`.
    pub fn remove(&self, index: usize) -> StoreResult<ObjKey> {
        self.link_list.remove(index)
    }

    /// Removes every link. Linked rows are not removed.
    pub fn remove_all(&self) -> StoreResult<()> {
        self.link_list.remove_all()
    }
}
