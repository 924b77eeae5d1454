use crate::{ObjKey, PropertyType};
use std::fmt;

/// Result type for store and handover operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// What a handover ticket referred to when its target disappeared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandoverTarget {
    /// A table (table ref, query, table view).
    Table,
    /// A single row.
    Row,
    /// A link list, identified by its owning row and column.
    LinkList,
}

impl fmt::Display for HandoverTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Table => "table",
            Self::Row => "row",
            Self::LinkList => "link list",
        })
    }
}

/// An error from the store or the handover layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The destination snapshot is older than the snapshot the ticket was
    /// exported from.
    #[error(
        "handover version incompatible: exported at version {exported}, \
         destination transaction is at version {current}"
    )]
    HandoverVersionIncompatible {
        /// Version of the exporting snapshot.
        exported: u64,
        /// Version of the importing snapshot.
        current: u64,
    },
    /// The referenced identity does not exist in the destination snapshot.
    #[error("handover target gone: the referenced {0} no longer exists")]
    HandoverTargetGone(HandoverTarget),
    /// The ticket was exported from a different environment than the
    /// destination transaction's.
    #[error("handover ticket belongs to a different environment")]
    HandoverEnvironmentMismatch,
    /// Export was attempted from a write transaction holding uncommitted
    /// changes.
    #[error("cannot export for handover from a write transaction with uncommitted changes")]
    DirtyWriteExport,
    /// The environment's limit on outstanding handover tickets was reached.
    #[error("too many outstanding handover tickets (limit {0})")]
    TooManyPinnedTickets(usize),
    /// No table with the given name.
    #[error("no such table: {0}")]
    NoSuchTable(String),
    /// A table with the given name already exists.
    #[error("table already exists: {0}")]
    TableExists(String),
    /// No column with the given name or index.
    #[error("no such column: {0}")]
    NoSuchColumn(String),
    /// A column with the given name already exists in the table.
    #[error("column already exists: {0}")]
    ColumnExists(String),
    /// The row does not exist in the current snapshot.
    #[error("no such object: {0}")]
    NoSuchObject(ObjKey),
    /// A value of the wrong type was written to or read from a column.
    #[error("type mismatch on column {column} (declared {declared})")]
    TypeMismatch {
        /// Column name.
        column: String,
        /// Declared column type.
        declared: PropertyType,
    },
    /// Null was written to a non-nullable column.
    #[error("column {0} is not nullable")]
    NotNullable(String),
    /// Positional access past the end of a list, view or result set.
    #[error("index {index} out of bounds (len {len})")]
    IndexOutOfBounds {
        /// Requested index.
        index: usize,
        /// Length at the time of access.
        len: usize,
    },
    /// A link column was given a table or object it does not target.
    #[error("link target mismatch on column {0}")]
    LinkTargetMismatch(String),
    /// The table cannot be removed while other tables link to it.
    #[error("table {0} is the target of links from another table")]
    TableIsLinkTarget(String),
    /// No registered object schema with the given class name.
    #[error("no such object schema: {0}")]
    NoSuchObjectSchema(String),
    /// A schema update conflicts with the registered schema.
    #[error("schema mismatch for class {0}")]
    SchemaMismatch(String),
    /// A cell value could not be decoded into the requested Rust type.
    #[error("cannot decode {found} as {wanted}")]
    DecodeTypeMismatch {
        /// Name of the requested Rust type.
        wanted: &'static str,
        /// Description of the stored value.
        found: &'static str,
    },
}
