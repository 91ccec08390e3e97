//! # LogWriter: catch-all event logger
//!
//! A minimal subscriber that records every event triggered on a registry
//! through `tracing` at `INFO` level. Use it for tests, demos or debugging.
//!
//! ## Example output (with a fmt subscriber installed)
//! ```text
//! INFO eventline::subscribers::log: event triggered writer="audit" event="balance-change" data=Balance { id: 1, amount: 40 }
//! ```

use std::fmt::Debug;

use tracing::info;

use crate::event::Unsubscribe;
use crate::events::Subscribable;

/// Event writer subscriber.
#[derive(Clone, Debug)]
pub struct LogWriter {
    name: &'static str,
}

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self { name: "LogWriter" }
    }

    /// Construct a writer whose records carry `name` in the `writer` field.
    #[must_use]
    pub fn named(name: &'static str) -> Self {
        Self { name }
    }

    /// Returns the name recorded with every line.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Subscribes the writer to every event of `source`.
    pub fn attach<T, S>(&self, source: &S) -> Unsubscribe
    where
        T: Debug + 'static,
        S: Subscribable<T>,
    {
        let writer = self.name;
        source.subscribe_all(move |event: &str, data: &T| {
            info!(writer, event, data = ?data, "event triggered");
        })
    }
}

impl Default for LogWriter {
    fn default() -> Self {
        Self::new()
    }
}
