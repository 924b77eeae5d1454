//! Cache for table name lookups, used by the [`Tx`] type
//!
//! [`Tx`]: crate::tx::Tx

use crate::TableKey;
use smallvec::SmallVec;
use std::{
    cell::RefCell,
    hash::{Hash, Hasher},
};

/// Cached table entry.
///
/// Entries are verified against the snapshot on every hit, so a stale entry
/// (table removed or re-created) costs a lookup rather than a wrong answer.
#[derive(Debug, Clone, Copy)]
struct CachedTable {
    /// Hash of the table name.
    name_hash: u64,
    /// The table's key when it was cached.
    key: TableKey,
}

/// Transaction-local cache of table keys by name.
///
/// Uses inline storage for the common case (most apps use < 16 tables).
#[derive(Debug, Default)]
pub(crate) struct TableCache(RefCell<SmallVec<[CachedTable; 16]>>);

impl TableCache {
    #[inline]
    fn hash_name(name: &str) -> u64 {
        let mut hasher = std::hash::DefaultHasher::new();
        name.hash(&mut hasher);
        hasher.finish()
    }

    /// Read a table key from the cache.
    pub(crate) fn read(&self, name: &str) -> Option<TableKey> {
        let name_hash = Self::hash_name(name);
        self.0.borrow().iter().find(|entry| entry.name_hash == name_hash).map(|entry| entry.key)
    }

    /// Write a table key to the cache, replacing any entry for the name.
    pub(crate) fn write(&self, name: &str, key: TableKey) {
        let name_hash = Self::hash_name(name);
        let mut cache = self.0.borrow_mut();
        cache.retain(|entry| entry.name_hash != name_hash);
        cache.push(CachedTable { name_hash, key });
    }

    /// Remove a table entry by key.
    pub(crate) fn remove(&self, key: TableKey) {
        self.0.borrow_mut().retain(|entry| entry.key != key);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn write_replaces_and_remove_evicts() {
        let cache = TableCache::default();
        assert_eq!(cache.read("a"), None);

        cache.write("a", TableKey(1));
        cache.write("b", TableKey(2));
        assert_eq!(cache.read("a"), Some(TableKey(1)));

        cache.write("a", TableKey(3));
        assert_eq!(cache.read("a"), Some(TableKey(3)));

        cache.remove(TableKey(3));
        assert_eq!(cache.read("a"), None);
        assert_eq!(cache.read("b"), Some(TableKey(2)));
    }
}
