use std::fmt;

/// Stable identity of a table.
///
/// Keys are never reused: a table removed and re-created under the same name
/// gets a fresh key, so tickets exported for the old table do not resolve to
/// the new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TableKey(pub(crate) u64);

impl TableKey {
    /// Returns the raw key value.
    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Stable identity of a row within its table.
///
/// Row keys are handed out in increasing order and never reused within a
/// table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjKey(pub u64);

impl fmt::Display for ObjKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj#{}", self.0)
    }
}

/// Positional column key within a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColKey(pub usize);

impl ColKey {
    /// Returns the column position.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for ColKey {
    fn from(index: usize) -> Self {
        Self(index)
    }
}
