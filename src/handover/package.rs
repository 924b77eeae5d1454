use crate::{Handover, StoreResult, ThreadConfined, TransactionKind, Tx};

/// A batch of handovers exported together and imported together.
///
/// Values are imported in export order. If any import fails, the remaining
/// envelopes are dropped and their snapshots released.
#[derive(Debug, Default)]
#[must_use = "dropping a package cancels every handover in it"]
pub struct HandoverPackage {
    handovers: Vec<Handover>,
}

impl HandoverPackage {
    /// Exports every value. On failure, envelopes exported so far are
    /// released.
    pub fn export_all<K: TransactionKind>(values: &[ThreadConfined<'_, K>]) -> StoreResult<Self> {
        let handovers =
            values.iter().map(ThreadConfined::export_for_handover).collect::<StoreResult<_>>()?;
        Ok(Self { handovers })
    }

    /// Number of values in the package.
    pub fn len(&self) -> usize {
        self.handovers.len()
    }

    /// Returns `true` if the package holds no values.
    pub fn is_empty(&self) -> bool {
        self.handovers.is_empty()
    }

    /// The newest snapshot version among the exports. An importing
    /// transaction must read at least this version.
    pub fn version(&self) -> Option<u64> {
        self.handovers.iter().map(Handover::version).max()
    }

    /// Imports every value into `tx`, in export order.
    pub fn import<K: TransactionKind>(self, tx: &Tx<K>) -> StoreResult<Vec<ThreadConfined<'_, K>>> {
        self.handovers.into_iter().map(|handover| handover.import_from_handover(tx)).collect()
    }
}

impl FromIterator<Handover> for HandoverPackage {
    fn from_iter<I: IntoIterator<Item = Handover>>(iter: I) -> Self {
        Self { handovers: iter.into_iter().collect() }
    }
}
