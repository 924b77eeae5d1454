use crate::{ColKey, ObjKey, StoreResult, sys::snapshot::TableData};
use std::cmp::Ordering;

/// One key of a [`SortDescriptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortClause {
    /// Column to compare.
    pub column: ColKey,
    /// Sort direction.
    pub ascending: bool,
}

/// A multi-column sort order.
///
/// Values compare as `Null < Bool < Int < String < Link`, and within a type
/// by their natural order. Sorting is stable: rows that compare equal keep
/// their creation order. An empty descriptor leaves rows in creation order.
///
/// ```
/// use signet_handover::{ColKey, SortDescriptor};
///
/// let sort = SortDescriptor::by(ColKey(0), false).then_by(ColKey(1), true);
/// assert_eq!(sort.clauses().len(), 2);
/// assert!(!sort.clauses()[0].ascending);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SortDescriptor {
    clauses: Vec<SortClause>,
}

impl SortDescriptor {
    /// An empty descriptor.
    pub const fn new() -> Self {
        Self { clauses: Vec::new() }
    }

    /// Sorts by a single column.
    pub fn by(column: impl Into<ColKey>, ascending: bool) -> Self {
        Self::new().then_by(column, ascending)
    }

    /// Adds a tie-breaking column.
    pub fn then_by(mut self, column: impl Into<ColKey>, ascending: bool) -> Self {
        self.clauses.push(SortClause { column: column.into(), ascending });
        self
    }

    /// The sort keys, most significant first.
    pub fn clauses(&self) -> &[SortClause] {
        &self.clauses
    }

    /// Returns `true` if the descriptor has no sort keys.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Sorts `keys` in place. Every clause must name a scalar column.
    pub(crate) fn apply(&self, table: &TableData, keys: &mut [ObjKey]) -> StoreResult<()> {
        for clause in &self.clauses {
            table.scalar_column(clause.column)?;
        }
        if self.clauses.is_empty() {
            return Ok(());
        }

        keys.sort_by(|a, b| {
            self.clauses
                .iter()
                .map(|clause| {
                    let ord = table
                        .value_ref(*a, clause.column)
                        .cmp(&table.value_ref(*b, clause.column));
                    if clause.ascending { ord } else { ord.reverse() }
                })
                .find(|ord| ord.is_ne())
                .unwrap_or(Ordering::Equal)
        });
        Ok(())
    }
}

impl<C: Into<ColKey>> FromIterator<(C, bool)> for SortDescriptor {
    fn from_iter<I: IntoIterator<Item = (C, bool)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |sort, (column, ascending)| sort.then_by(column, ascending))
    }
}
