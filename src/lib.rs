//! # eventline
//!
//! **eventline** is a small in-process publish/subscribe library for Rust.
//!
//! It provides typed events that independent components can subscribe to and
//! trigger, without knowing about each other beyond the shared payload type.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  publisher   │   │  subscriber  │   │  subscriber  │
//!     │ trigger(..)  │   │   on("a")    │   │subscribe_all │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Events<T> (named registry)                                       │
//! │  - name map (own lock, lookup/creation only)                      │
//! │  - catch-all Event<(name, T)>                                     │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │ Event<T> "a" │   │ Event<T> "b" │   │  catch-all   │
//!     │ slots + lock │   │ slots + lock │   │ slots + lock │
//!     └──────┬───────┘   └──────────────┘   └──────────────┘
//!            ▼
//!     sub1(&T) ─► sub2(&T) ─► subN(&T)        (trigger: in order)
//!     sub1 ║ sub2 ║ subN ─► join              (trigger_async: concurrent)
//! ```
//!
//! ### Delivery
//! ```text
//! Events::trigger(name, data)
//!   ├─► Event[name].trigger(&data)   (skipped if name was never subscribed)
//!   └─► catch-all.trigger(&(name, data))
//!
//! Event::trigger(&data)
//!   ├─ snapshot keys (lock held for the copy only)
//!   └─ for each key: still subscribed? ─► call (no lock held)
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits             |
//! |-------------------|---------------------------------------------------------------|--------------------------------|
//! | **Channel**       | Ordered subscribers, sync/concurrent triggering.              | [`Event`]                      |
//! | **Handles**       | Idempotent, thread-safe removal.                              | [`Unsubscribe`]                |
//! | **Registry**      | Named events plus a catch-all stream.                         | [`Events`], [`Subscribable`]   |
//! | **Errors**        | Panics isolated by concurrent triggering.                     | [`TriggerError`]               |
//! | **Configuration** | Thread settings for concurrent fan-out.                       | [`Config`]                     |
//!
//! ## Failure policy
//! - [`Event::trigger`] / [`Events::trigger`] are fail-fast: a panicking
//!   subscriber unwinds into the caller and skips the rest of that pass.
//! - [`Event::trigger_async`] / [`Events::trigger_async`] isolate each
//!   subscriber: all of them run and are joined, then panics are reported
//!   as [`TriggerError::SubscribersPanicked`].
//!
//! ## Optional features
//! - `logging`: exports a built-in [`LogWriter`] catch-all subscriber that
//!   records events through `tracing`.
//!
//! ## Example
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use eventline::Events;
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let events = Events::<u64>::new();
//!
//! let s = Arc::clone(&seen);
//! let changes = events.on("balance-change", move |amount| {
//!     s.lock().unwrap().push(*amount);
//! });
//!
//! events.trigger("balance-change", 10);
//! events.trigger("balance-block", 99);
//! changes.unsubscribe();
//! events.trigger("balance-change", 20);
//!
//! assert_eq!(*seen.lock().unwrap(), vec![10]);
//! ```
mod config;
mod error;
mod event;
mod events;
mod subscribers;

// ---- Public re-exports ----

pub use config::Config;
pub use error::{SubscriberPanic, TriggerError};
pub use event::{Event, Unsubscribe};
pub use events::{Events, Subscribable};

// Optional: expose a simple built-in logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
