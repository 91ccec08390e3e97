//! # Subscribe-only access to a registry.
//!
//! [`Subscribable`] exposes the subscribing half of [`Events`] so an owner can
//! hand out the right to listen without the right to trigger.
//!
//! ## Example
//! ```rust
//! use eventline::{Events, Subscribable, Unsubscribe};
//!
//! struct Orders {
//!     events: Events<u64>,
//! }
//!
//! impl Orders {
//!     fn listeners(&self) -> &impl Subscribable<u64> {
//!         &self.events
//!     }
//!
//!     fn place(&self, id: u64) {
//!         self.events.trigger("placed", id);
//!     }
//! }
//!
//! let orders = Orders { events: Events::new() };
//! let handle: Unsubscribe = orders.listeners().on("placed", |id| println!("order {id}"));
//! orders.place(7);
//! handle.unsubscribe();
//! ```

use crate::event::Unsubscribe;

use super::Events;

/// Subscribing side of a named event registry.
pub trait Subscribable<T> {
    /// Subscribes to one named event.
    fn on<F>(&self, name: &str, subscriber: F) -> Unsubscribe
    where
        F: Fn(&T) + Send + Sync + 'static;

    /// Subscribes to every event, receiving its name with the data.
    fn subscribe_all<F>(&self, subscriber: F) -> Unsubscribe
    where
        F: Fn(&str, &T) + Send + Sync + 'static;

    /// Subscribes to the listed events (all events when `names` is empty).
    fn subscribe_to<F, I>(&self, subscriber: F, names: I) -> Unsubscribe
    where
        F: Fn(&str, &T) + Send + Sync + 'static,
        I: IntoIterator,
        I::Item: AsRef<str>;
}

impl<T: 'static> Subscribable<T> for Events<T> {
    fn on<F>(&self, name: &str, subscriber: F) -> Unsubscribe
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        Events::on(self, name, subscriber)
    }

    fn subscribe_all<F>(&self, subscriber: F) -> Unsubscribe
    where
        F: Fn(&str, &T) + Send + Sync + 'static,
    {
        Events::subscribe_all(self, subscriber)
    }

    fn subscribe_to<F, I>(&self, subscriber: F, names: I) -> Unsubscribe
    where
        F: Fn(&str, &T) + Send + Sync + 'static,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Events::subscribe_to(self, subscriber, names)
    }
}
