//! Payload of the catch-all channel: an event name paired with its data.

use std::sync::Arc;

/// One triggered event as seen by catch-all subscribers.
pub(crate) struct Named<T> {
    pub(crate) name: Arc<str>,
    pub(crate) data: T,
}

impl<T> Named<T> {
    pub(crate) fn new(name: &str, data: T) -> Self {
        Self {
            name: Arc::from(name),
            data,
        }
    }
}
