//! Transaction-bound accessors.
//!
//! Every accessor borrows the [`Tx`] it was created from and is therefore
//! confined to that transaction's thread. Low-level accessors ([`TableRef`],
//! [`Row`], [`LinkList`], [`Query`], [`TableView`]) each export a
//! [`Ticket`]; the high-level ones ([`Object`], [`List`], [`Results`]) are
//! moved between threads through a [`ThreadConfined`] value.
//!
//! [`Tx`]: crate::Tx
//! [`Ticket`]: crate::Ticket
//! [`ThreadConfined`]: crate::ThreadConfined

mod link_list;
pub use link_list::LinkList;

mod list;
pub use list::List;

mod object;
pub use object::Object;

mod query;
pub use query::{CompareOp, Condition, Query};

mod results;
pub use results::Results;

mod row;
pub use row::Row;

mod sort;
pub use sort::{SortClause, SortDescriptor};

mod table;
pub use table::TableRef;

mod table_view;
pub use table_view::TableView;
