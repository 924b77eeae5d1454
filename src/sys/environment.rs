use crate::{
    RoTx, RwTx,
    sys::{pins::PinRegistry, snapshot::Snapshot},
};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

/// Default limit on outstanding handover tickets.
const DEFAULT_MAX_PINNED_TICKETS: usize = 1024;

#[derive(Debug)]
struct EnvironmentInner {
    name: String,
    latest: RwLock<Arc<Snapshot>>,
    writer: Arc<Mutex<()>>,
    pins: Mutex<PinRegistry>,
    max_pinned_tickets: usize,
}

/// An in-memory, multi-version database.
///
/// Cloning is cheap and every clone refers to the same database. The
/// environment is `Send + Sync`; open a transaction per thread with
/// [`Environment::begin_ro_txn`] or [`Environment::begin_rw_txn`].
///
/// ```
/// use signet_handover::{Environment, PropertyFlags, PropertyType};
///
/// let env = Environment::builder().set_name("docs").open();
///
/// let txn = env.begin_rw_txn();
/// let table = txn.create_table("people").unwrap();
/// let name = txn
///     .add_column("people", "name", PropertyType::String, PropertyFlags::empty(), None)
///     .unwrap();
/// table.add_empty_row().unwrap().set(name, "Ada").unwrap();
/// assert_eq!(txn.commit(), 1);
///
/// let txn = env.begin_ro_txn();
/// let table = txn.open_table("people").unwrap();
/// assert_eq!(table.row_at(0).unwrap().get_as::<String>(name).unwrap(), "Ada");
/// ```
#[derive(Debug, Clone)]
pub struct Environment {
    inner: Arc<EnvironmentInner>,
}

impl Environment {
    /// Creates a builder for configuring an environment.
    pub fn builder() -> EnvironmentBuilder {
        EnvironmentBuilder::default()
    }

    /// The environment's name, used in tracing spans.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Begins a read-only transaction on the latest committed snapshot.
    pub fn begin_ro_txn(&self) -> RoTx {
        RoTx::begin(self.clone())
    }

    /// Begins a read-write transaction.
    ///
    /// Blocks until no other write transaction is open. The transaction
    /// starts from the latest committed snapshot.
    pub fn begin_rw_txn(&self) -> RwTx {
        RwTx::begin(self.clone())
    }

    /// Version of the latest committed snapshot.
    pub fn latest_version(&self) -> u64 {
        self.inner.latest.read().version
    }

    /// Returns a summary of the environment's state.
    pub fn info(&self) -> Info {
        let latest_version = self.latest_version();
        let pins = self.inner.pins.lock();
        Info { latest_version, pinned_tickets: pins.total(), oldest_pinned_version: pins.oldest() }
    }

    /// Returns `true` if both handles refer to the same database.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn latest(&self) -> Arc<Snapshot> {
        Arc::clone(&self.inner.latest.read())
    }

    pub(crate) fn publish(&self, snapshot: Arc<Snapshot>) {
        *self.inner.latest.write() = snapshot;
    }

    pub(crate) fn writer(&self) -> &Arc<Mutex<()>> {
        &self.inner.writer
    }

    pub(crate) fn pins(&self) -> &Mutex<PinRegistry> {
        &self.inner.pins
    }

    pub(crate) fn max_pinned_tickets(&self) -> usize {
        self.inner.max_pinned_tickets
    }
}

/// Environment information.
///
/// Contains the latest committed version and the state of outstanding
/// handover tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Info {
    latest_version: u64,
    pinned_tickets: usize,
    oldest_pinned_version: Option<u64>,
}

impl Info {
    /// Version of the latest committed snapshot.
    #[inline]
    pub const fn latest_version(&self) -> u64 {
        self.latest_version
    }

    /// Number of exported tickets that have been neither imported nor
    /// dropped.
    #[inline]
    pub const fn pinned_tickets(&self) -> usize {
        self.pinned_tickets
    }

    /// Oldest snapshot version held by an outstanding ticket.
    #[inline]
    pub const fn oldest_pinned_version(&self) -> Option<u64> {
        self.oldest_pinned_version
    }
}

/// Options for opening or creating an environment.
#[derive(Debug, Clone)]
pub struct EnvironmentBuilder {
    name: String,
    max_pinned_tickets: usize,
}

impl Default for EnvironmentBuilder {
    fn default() -> Self {
        Self { name: "default".to_owned(), max_pinned_tickets: DEFAULT_MAX_PINNED_TICKETS }
    }
}

impl EnvironmentBuilder {
    /// Opens an empty environment at version 0.
    pub fn open(&self) -> Environment {
        let inner = EnvironmentInner {
            name: self.name.clone(),
            latest: RwLock::new(Arc::new(Snapshot::default())),
            writer: Arc::new(Mutex::new(())),
            pins: Mutex::new(PinRegistry::default()),
            max_pinned_tickets: self.max_pinned_tickets,
        };
        tracing::debug!(target: "handover", env = %self.name, "opened environment");
        Environment { inner: Arc::new(inner) }
    }

    /// Sets the name used to label this environment's tracing spans.
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    /// Sets the maximum number of outstanding handover tickets.
    ///
    /// Exports fail with [`StoreError::TooManyPinnedTickets`] once the limit
    /// is reached. Zero means unlimited. Defaults to 1024.
    ///
    /// [`StoreError::TooManyPinnedTickets`]: crate::StoreError::TooManyPinnedTickets
    pub fn set_max_pinned_tickets(&mut self, max_pinned_tickets: usize) -> &mut Self {
        self.max_pinned_tickets = max_pinned_tickets;
        self
    }
}
