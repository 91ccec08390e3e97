//! Single event channel: subscriber list, handles and fan-out.
//!
//! ## Contents
//! - [`Event`] ordered subscriber list with sync and concurrent triggering
//! - [`Unsubscribe`] idempotent removal handle returned by every subscribe call
//!
//! Internals:
//! - `slots` generation-tagged arena threaded into an insertion-ordered list
//! - `fanout` one-thread-per-subscriber (or blocking-pool) counted join

mod channel;
mod fanout;
mod handle;
mod slots;

pub use channel::Event;
pub use handle::Unsubscribe;

pub(crate) use channel::{Subscriber, lock};
pub(crate) use fanout::{Job, run_blocking, run_scoped};
