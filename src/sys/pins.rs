use crate::{Environment, StoreError, StoreResult, sys::snapshot::Snapshot};
use core::fmt;
use std::{collections::BTreeMap, sync::Arc};

/// Counts outstanding handover tickets per snapshot version.
#[derive(Debug, Default)]
pub(crate) struct PinRegistry {
    counts: BTreeMap<u64, usize>,
    total: usize,
}

impl PinRegistry {
    /// Registers a pin. A `limit` of zero means unlimited.
    pub(crate) fn acquire(&mut self, version: u64, limit: usize) -> StoreResult<()> {
        if limit != 0 && self.total >= limit {
            return Err(StoreError::TooManyPinnedTickets(limit));
        }
        *self.counts.entry(version).or_default() += 1;
        self.total += 1;
        Ok(())
    }

    pub(crate) fn release(&mut self, version: u64) {
        let Some(count) = self.counts.get_mut(&version) else {
            debug_assert!(false, "released unpinned version {version}");
            return;
        };
        *count -= 1;
        if *count == 0 {
            self.counts.remove(&version);
        }
        self.total -= 1;
    }

    pub(crate) const fn total(&self) -> usize {
        self.total
    }

    pub(crate) fn oldest(&self) -> Option<u64> {
        self.counts.keys().next().copied()
    }
}

/// Keeps an exported snapshot alive and registered until the ticket holding
/// it is imported or dropped.
///
/// Release happens in [`Drop`], so it runs exactly once on both paths.
pub(crate) struct VersionPin {
    env: Environment,
    snapshot: Arc<Snapshot>,
}

impl VersionPin {
    pub(crate) fn new(env: Environment, snapshot: Arc<Snapshot>) -> StoreResult<Self> {
        env.pins().lock().acquire(snapshot.version, env.max_pinned_tickets())?;
        tracing::trace!(target: "handover", version = snapshot.version, "pinned");
        Ok(Self { env, snapshot })
    }

    pub(crate) const fn env(&self) -> &Environment {
        &self.env
    }

    pub(crate) fn version(&self) -> u64 {
        self.snapshot.version
    }
}

impl fmt::Debug for VersionPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionPin").field("version", &self.snapshot.version).finish()
    }
}

impl Drop for VersionPin {
    fn drop(&mut self) {
        self.env.pins().lock().release(self.snapshot.version);
        tracing::trace!(target: "handover", version = self.snapshot.version, "released");
    }
}
