//! Named events: a registry of independent channels plus a catch-all stream.
//!
//! ## Contents
//! - [`Events`] name → [`Event`](crate::Event) map with a catch-all channel
//! - [`Subscribable`] subscribe-only view of a registry
//!
//! Every concurrency-sensitive operation is delegated to the per-name
//! [`Event`](crate::Event); the registry only owns the name map.

mod named;
mod registry;
mod subscribable;

pub use registry::Events;
pub use subscribable::Subscribable;
