//! Built-in subscribers.
//!
//! - `LogWriter` (feature `logging`): catch-all subscriber that records every
//!   triggered event through `tracing`.

#[cfg(feature = "logging")]
mod log;

#[cfg(feature = "logging")]
pub use log::LogWriter;
