//! Moving accessors between threads.
//!
//! A [`ThreadConfined`] value wraps one high-level accessor bound to a
//! transaction. Exporting it yields a [`Handover`]: a `Send + 'static`,
//! single-use envelope holding a version-pinned ticket plus whatever the
//! ticket cannot restore on its own (the class descriptor of an object, the
//! sort order of a result set). Importing the envelope into a transaction on
//! another thread rebuilds an equivalent value bound to that transaction.
//!
//! Delivery of the envelope (channels, queues, ...) is up to the caller.

mod confined;
pub use confined::{ThreadConfined, ThreadConfinedType};

mod envelope;
pub use envelope::Handover;

mod package;
pub use package::HandoverPackage;

// Envelopes and tickets are `Send + 'static` but never `Clone`: each is
// imported at most once.
const _: () = {
    const fn assert_send_static<T: Send + 'static>() {}
    assert_send_static::<Handover>();
    assert_send_static::<HandoverPackage>();
    assert_send_static::<crate::RowTicket>();
    assert_send_static::<crate::TableViewTicket>();
};
