use crate::{
    ColKey, Environment, ObjectSchema, PropertyFlags, PropertyType, Ro, Schema, StoreError,
    StoreResult, TableRef, TransactionKind, WriteMarker,
    sys::{pins::VersionPin, snapshot::Snapshot},
    tx::cache::TableCache,
};
use core::fmt;
use std::{
    cell::{Cell, RefCell},
    marker::PhantomData,
    sync::Arc,
};
use tracing::debug;

/// Meta-data for a transaction.
struct TxMeta {
    env: Environment,
    span: tracing::Span,
}

impl fmt::Debug for TxMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TxMeta").finish()
    }
}

/// A transaction bound to one snapshot of an [`Environment`].
///
/// Prefer using the [`RoTx`] or [`RwTx`] type aliases, unless specifically
/// implementing generic code over both transaction kinds.
///
/// A transaction is never `Sync`. Every accessor ([`Row`], [`Query`],
/// [`Object`], ...) borrows its transaction and is therefore confined to the
/// thread that owns it. Moving an accessor's reference to another thread
/// requires exporting it for handover.
///
/// [`RoTx`]: crate::tx::aliases::RoTx
/// [`RwTx`]: crate::tx::aliases::RwTx
/// [`Row`]: crate::Row
/// [`Query`]: crate::Query
/// [`Object`]: crate::Object
pub struct Tx<K: TransactionKind> {
    snapshot: RefCell<Arc<Snapshot>>,

    dirty: Cell<bool>,

    committed: Cell<bool>,

    cache: TableCache,

    meta: TxMeta,

    _guard: K::Guard,

    _kind: PhantomData<K>,
}

impl<K: TransactionKind> fmt::Debug for Tx<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tx")
            .field("version", &self.version())
            .field("dirty", &self.dirty.get())
            .finish_non_exhaustive()
    }
}

impl<K: TransactionKind> Tx<K> {
    /// Begins a transaction on the latest committed snapshot.
    pub(crate) fn begin(env: Environment) -> Self {
        // Writers must own the guard before reading the latest snapshot.
        let guard = K::acquire(&env);
        let snapshot = env.latest();
        let span = K::new_span(env.name(), snapshot.version);
        debug!(target: "handover", parent: &span, "begin");
        Self {
            snapshot: RefCell::new(snapshot),
            dirty: Cell::new(false),
            committed: Cell::new(false),
            cache: TableCache::default(),
            meta: TxMeta { env, span },
            _guard: guard,
            _kind: PhantomData,
        }
    }

    /// Returns a reference to the environment.
    #[inline(always)]
    pub const fn env(&self) -> &Environment {
        &self.meta.env
    }

    /// Returns the tracing span for this transaction.
    #[inline(always)]
    pub const fn span(&self) -> &tracing::Span {
        &self.meta.span
    }

    /// Snapshot version this transaction reads.
    ///
    /// For write transactions this is the version the transaction started
    /// from; the committed version is returned by [`Tx::commit`].
    pub fn version(&self) -> u64 {
        self.snapshot.borrow().version
    }

    /// Returns `true` if this transaction holds uncommitted changes.
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Runs `f` against the transaction's current view.
    ///
    /// `f` must not call back into the transaction.
    pub(crate) fn read<R>(&self, f: impl FnOnce(&Snapshot) -> R) -> R {
        f(&self.snapshot.borrow())
    }

    /// Opens a handle to a table.
    pub fn open_table(&self, name: &str) -> StoreResult<TableRef<'_, K>> {
        if let Some(key) = self.cache.read(name) {
            if self.read(|s| s.table(key).is_some_and(|t| t.name() == name)) {
                return Ok(TableRef::new(self, key));
            }
        }

        let key = self
            .read(|s| s.table_key(name))
            .ok_or_else(|| StoreError::NoSuchTable(name.to_owned()))?;
        self.cache.write(name, key);
        Ok(TableRef::new(self, key))
    }

    /// Returns `true` if a table with the given name exists.
    pub fn has_table(&self, name: &str) -> bool {
        self.read(|s| s.table_key(name).is_some())
    }

    /// Names of all tables, in lexicographic order.
    pub fn table_names(&self) -> Vec<String> {
        self.read(|s| s.table_names().map(str::to_owned).collect())
    }

    /// Looks up the registered descriptor of a class.
    pub fn object_schema(&self, class: &str) -> StoreResult<Arc<ObjectSchema>> {
        self.read(|s| s.class(class).cloned())
            .ok_or_else(|| StoreError::NoSuchObjectSchema(class.to_owned()))
    }

    /// All registered class descriptors, ordered by class name.
    pub fn object_schemas(&self) -> Vec<Arc<ObjectSchema>> {
        self.read(|s| s.classes().cloned().collect())
    }

    /// Pins the current snapshot for an export.
    pub(crate) fn pin(&self) -> StoreResult<VersionPin> {
        if self.dirty.get() {
            return Err(StoreError::DirtyWriteExport);
        }
        VersionPin::new(self.meta.env.clone(), Arc::clone(&self.snapshot.borrow()))
    }

    /// Fails if this transaction cannot see a snapshot exported at
    /// `exported`.
    pub(crate) fn check_version(&self, exported: u64) -> StoreResult<()> {
        let current = self.version();
        if current < exported {
            return Err(StoreError::HandoverVersionIncompatible { exported, current });
        }
        Ok(())
    }
}

impl Tx<Ro> {
    /// Advances the transaction to the latest committed snapshot.
    ///
    /// Returns `true` if the version changed. Takes `&mut self`, so no
    /// accessor bound to the old snapshot can outlive the refresh.
    pub fn refresh(&mut self) -> bool {
        let latest = self.meta.env.latest();
        let version = latest.version;
        if version == self.version() {
            return false;
        }
        *self.snapshot.get_mut() = latest;
        self.meta.span = Ro::new_span(self.meta.env.name(), version);
        debug!(target: "handover", parent: &self.meta.span, "refreshed");
        true
    }
}

// Write-only
impl<K: WriteMarker> Tx<K> {
    /// Runs `f` against the transaction's private copy of the snapshot and
    /// marks the transaction dirty if it succeeds.
    ///
    /// `f` must not call back into the transaction.
    pub(crate) fn write<R>(
        &self,
        f: impl FnOnce(&mut Snapshot) -> StoreResult<R>,
    ) -> StoreResult<R> {
        let mut snapshot = self.snapshot.borrow_mut();
        let out = f(Arc::make_mut(&mut snapshot))?;
        self.dirty.set(true);
        Ok(out)
    }

    /// Creates an empty table.
    pub fn create_table(&self, name: &str) -> StoreResult<TableRef<'_, K>> {
        let key = self.write(|s| s.create_table(name))?;
        self.cache.write(name, key);
        Ok(TableRef::new(self, key))
    }

    /// Removes a table and unregisters any class backed by it.
    ///
    /// Fails with [`StoreError::TableIsLinkTarget`] while another table links
    /// to it.
    pub fn remove_table(&self, name: &str) -> StoreResult<()> {
        let key = self.read(|s| s.table_key(name));
        self.write(|s| s.remove_table(name))?;
        if let Some(key) = key {
            self.cache.remove(key);
        }
        Ok(())
    }

    /// Appends a column to a table. Existing rows get the column's default.
    ///
    /// `target` names the target table and must be given exactly for
    /// [`PropertyType::Object`] and [`PropertyType::Array`] columns.
    pub fn add_column(
        &self,
        table: &str,
        name: &str,
        kind: PropertyType,
        flags: PropertyFlags,
        target: Option<&str>,
    ) -> StoreResult<ColKey> {
        let table = self.open_table(table)?.key();
        self.write(|s| s.add_column(table, name, kind, flags, target))
    }

    /// Creates the tables and columns for every new class in `schema` and
    /// registers their descriptors. Classes that are already registered must
    /// match exactly.
    pub fn update_schema(&self, schema: &Schema) -> StoreResult<()> {
        self.write(|s| s.update_schema(schema))
    }

    /// Commits the transaction, publishing its snapshot.
    ///
    /// Returns the new version. A transaction without changes publishes
    /// nothing and returns the version it started from.
    pub fn commit(self) -> u64 {
        self.committed.set(true);
        if !self.dirty.get() {
            debug!(target: "handover", parent: &self.meta.span, "commit without changes");
            return self.version();
        }

        let mut snapshot = self.snapshot.replace(Arc::default());
        let version = snapshot.version + 1;
        Arc::make_mut(&mut snapshot).version = version;
        self.meta.env.publish(snapshot);
        debug!(target: "handover", parent: &self.meta.span, version, "committed");
        version
    }
}

impl<K: TransactionKind> Drop for Tx<K> {
    fn drop(&mut self) {
        if self.dirty.get() && !self.committed.get() {
            debug!(target: "handover", parent: &self.meta.span, "aborted");
        }
    }
}
