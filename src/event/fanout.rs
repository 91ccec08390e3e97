//! # Concurrent fan-out: one unit of work per subscriber, counted join.
//!
//! ## Architecture
//! ```text
//! run_scoped(jobs)                         run_blocking(jobs)
//!     │                                        │
//!     ├──► thread 0 ──► job 0                  ├──► spawn_blocking ──► job 0
//!     ├──► thread 1 ──► job 1                  ├──► spawn_blocking ──► job 1
//!     └──► thread N ──► job N                  └──► spawn_blocking ──► job N
//!     │                                        │
//!     └── join every handle ──► panics         └── join_all ──► panics
//! ```
//!
//! ## Rules
//! - Every started job is joined before returning, even when a spawn fails.
//! - A panicking job is reported as [`SubscriberPanic`] and never stops the others.
//! - No timeouts: a job that never returns blocks the join forever.

use tracing::warn;

use crate::config::Config;
use crate::error::{SubscriberPanic, TriggerError};

/// One subscriber invocation bound to its payload.
pub(crate) type Job<'a> = Box<dyn FnOnce() + Send + 'a>;

/// Runs every job on its own scoped OS thread and blocks until all finish.
pub(crate) fn run_scoped(config: &Config, jobs: Vec<Job<'_>>) -> Result<(), TriggerError> {
    if jobs.is_empty() {
        return Ok(());
    }

    std::thread::scope(|scope| {
        let mut handles = Vec::with_capacity(jobs.len());
        let mut spawn_error = None;

        for (position, job) in jobs.into_iter().enumerate() {
            match config.thread_builder().spawn_scoped(scope, job) {
                Ok(handle) => handles.push((position, handle)),
                Err(source) => {
                    warn!(position, error = %source, "failed to spawn subscriber thread");
                    spawn_error = Some(source);
                    break;
                }
            }
        }

        let mut panics = Vec::new();
        for (position, handle) in handles {
            if let Err(payload) = handle.join() {
                let panic = SubscriberPanic::from_payload(position, payload.as_ref());
                warn!(position, message = %panic.message, "subscriber panicked");
                panics.push(panic);
            }
        }

        match spawn_error {
            Some(source) => Err(TriggerError::Spawn { source }),
            None => TriggerError::check(panics),
        }
    })
}

/// Runs every job on tokio's blocking pool and awaits all of them.
pub(crate) async fn run_blocking(jobs: Vec<Job<'static>>) -> Result<(), TriggerError> {
    if jobs.is_empty() {
        return Ok(());
    }

    let handles: Vec<_> = jobs.into_iter().map(tokio::task::spawn_blocking).collect();
    let results = futures::future::join_all(handles).await;

    let mut panics = Vec::new();
    let mut join_error = None;
    for (position, result) in results.into_iter().enumerate() {
        match result {
            Ok(()) => {}
            Err(err) if err.is_panic() => {
                let payload = err.into_panic();
                let panic = SubscriberPanic::from_payload(position, payload.as_ref());
                warn!(position, message = %panic.message, "subscriber panicked");
                panics.push(panic);
            }
            Err(err) => {
                warn!(position, error = %err, "failed to join subscriber");
                join_error = Some(err.to_string());
            }
        }
    }

    match join_error {
        Some(reason) => Err(TriggerError::Join { reason }),
        None => TriggerError::check(panics),
    }
}
