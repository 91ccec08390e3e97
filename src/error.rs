//! Error types returned by concurrent triggering.
//!
//! Synchronous [`Event::trigger`](crate::Event::trigger) never returns an error:
//! a panicking subscriber unwinds straight into the caller (fail-fast).
//! The concurrent variants isolate every subscriber instead, so they report
//! through [`TriggerError`]:
//!
//! - [`TriggerError::SubscribersPanicked`]: one or more subscribers panicked;
//!   all others still ran to completion.
//! - [`TriggerError::Spawn`]: the runtime could not start a subscriber thread.
//! - [`TriggerError::Join`]: a spawned subscriber could not be joined.

use std::any::Any;
use std::fmt;

use thiserror::Error;

/// A subscriber that panicked during a concurrent trigger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubscriberPanic {
    /// Index of the subscriber in the delivery snapshot of that trigger.
    pub position: usize,
    /// Panic message, or `"unknown panic"` for non-string payloads.
    pub message: String,
}

impl SubscriberPanic {
    pub(crate) fn from_payload(position: usize, payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(msg) = payload.downcast_ref::<&'static str>() {
            (*msg).to_string()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            "unknown panic".to_string()
        };
        Self { position, message }
    }
}

impl fmt::Display for SubscriberPanic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subscriber #{} panicked: {}", self.position, self.message)
    }
}

/// # Errors produced by concurrent fan-out.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TriggerError {
    /// Some subscribers panicked; every other subscriber completed normally.
    #[error("{} subscriber(s) panicked", .panics.len())]
    SubscribersPanicked {
        /// One entry per panicking subscriber, ordered by position.
        panics: Vec<SubscriberPanic>,
    },

    /// A subscriber thread could not be spawned.
    ///
    /// Subscribers started before the failure were still joined.
    #[error("failed to spawn subscriber thread: {source}")]
    Spawn {
        /// The OS error from the thread builder.
        #[source]
        source: std::io::Error,
    },

    /// A spawned subscriber was lost without panicking (runtime shut down).
    #[error("failed to join subscriber: {reason}")]
    Join {
        /// Join failure description.
        reason: String,
    },
}

impl TriggerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use eventline::TriggerError;
    ///
    /// let err = TriggerError::SubscribersPanicked { panics: vec![] };
    /// assert_eq!(err.as_label(), "trigger_subscribers_panicked");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TriggerError::SubscribersPanicked { .. } => "trigger_subscribers_panicked",
            TriggerError::Spawn { .. } => "trigger_spawn_failed",
            TriggerError::Join { .. } => "trigger_join_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TriggerError::SubscribersPanicked { panics } => {
                let details: Vec<String> = panics.iter().map(ToString::to_string).collect();
                format!("panicked: [{}]", details.join("; "))
            }
            TriggerError::Spawn { source } => format!("spawn: {source}"),
            TriggerError::Join { reason } => format!("join: {reason}"),
        }
    }

    /// Returns the collected subscriber panics (empty for other variants).
    pub fn panics(&self) -> &[SubscriberPanic] {
        match self {
            TriggerError::SubscribersPanicked { panics } => panics,
            _ => &[],
        }
    }

    pub(crate) fn check(mut panics: Vec<SubscriberPanic>) -> Result<(), TriggerError> {
        if panics.is_empty() {
            return Ok(());
        }
        panics.sort_by_key(|p| p.position);
        Err(TriggerError::SubscribersPanicked { panics })
    }
}
