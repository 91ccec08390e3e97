//! # Subscription handle.
//!
//! [`Unsubscribe`] is returned by every subscribe call and is the only way to
//! remove that subscriber later.
//!
//! ## Rules
//! - The first `unsubscribe()` removes; every later call is a silent no-op.
//! - Concurrent calls (from clones on other threads) collapse into one removal,
//!   and none of them returns before that removal has finished.
//! - Dropping a handle does **not** unsubscribe; the subscriber stays until the
//!   channel itself is dropped.
//! - The handle never keeps a channel alive: it holds a weak reference only.

use std::fmt;
use std::sync::{Arc, Once};

struct Inner {
    once: Once,
    remove: Box<dyn Fn() + Send + Sync>,
}

/// Removal capability for one subscription.
///
/// Cloning is cheap; all clones share the same once-only removal.
///
/// # Example
/// ```rust
/// use eventline::Event;
///
/// let event = Event::<u32>::new();
/// let handle = event.subscribe(|n| println!("got {n}"));
/// assert_eq!(event.len(), 1);
///
/// handle.unsubscribe();
/// handle.unsubscribe(); // no-op
/// assert!(handle.is_unsubscribed());
/// assert!(event.is_empty());
/// ```
#[derive(Clone)]
#[must_use = "dropping the handle leaves the subscriber attached with no way to remove it"]
pub struct Unsubscribe {
    inner: Arc<Inner>,
}

impl Unsubscribe {
    pub(crate) fn new(remove: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(Inner {
                once: Once::new(),
                remove: Box::new(remove),
            }),
        }
    }

    /// Combines several handles into one that removes all of them once.
    pub(crate) fn combine(handles: Vec<Unsubscribe>) -> Self {
        Self::new(move || {
            for handle in &handles {
                handle.unsubscribe();
            }
        })
    }

    /// Removes the subscriber if it is still attached.
    pub fn unsubscribe(&self) {
        self.inner.once.call_once(|| (self.inner.remove)());
    }

    /// Returns `true` once removal has run through any clone of this handle.
    #[must_use]
    pub fn is_unsubscribed(&self) -> bool {
        self.inner.once.is_completed()
    }
}

impl fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unsubscribe")
            .field("unsubscribed", &self.is_unsubscribed())
            .finish()
    }
}
