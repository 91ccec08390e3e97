//! # Fan-out configuration.
//!
//! [`Config`] carries the settings used when subscribers are run on their own
//! threads by [`Event::trigger_async`](crate::Event::trigger_async) and
//! [`Events::trigger_async`](crate::Events::trigger_async).
//!
//! A registry shares one `Config` with every channel it creates.
//!
//! ## Sentinel values
//! - `stack_size = 0` → platform default stack size

use std::thread;

/// Settings for concurrent fan-out.
///
/// ## Field semantics
/// - `thread_name`: name given to every subscriber thread (shows up in panic messages)
/// - `stack_size`: stack size in bytes for subscriber threads (`0` = platform default)
#[derive(Clone, Debug)]
pub struct Config {
    /// Name of the threads spawned per subscriber.
    pub thread_name: String,

    /// Stack size for subscriber threads.
    ///
    /// - `0` = platform default
    /// - `n > 0` = exactly `n` bytes (subject to platform minimums)
    pub stack_size: usize,
}

impl Config {
    /// Returns the configured stack size as an `Option`.
    ///
    /// - `None` → platform default
    /// - `Some(n)` → `n` bytes
    #[inline]
    pub fn stack_size(&self) -> Option<usize> {
        if self.stack_size == 0 {
            None
        } else {
            Some(self.stack_size)
        }
    }

    /// Builds a thread builder for one subscriber thread.
    pub(crate) fn thread_builder(&self) -> thread::Builder {
        let builder = thread::Builder::new().name(self.thread_name.clone());
        match self.stack_size() {
            Some(size) => builder.stack_size(size),
            None => builder,
        }
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `thread_name = "eventline-subscriber"`
    /// - `stack_size = 0` (platform default)
    fn default() -> Self {
        Self {
            thread_name: "eventline-subscriber".to_string(),
            stack_size: 0,
        }
    }
}
