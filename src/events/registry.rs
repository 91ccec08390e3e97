//! # Named event registry.
//!
//! [`Events<T>`] maps event names to independent [`Event<T>`] channels and
//! keeps one extra catch-all channel that sees every triggered event together
//! with its name.
//!
//! ## Architecture
//! ```text
//! on("a", f) ──► channels["a"] (created on first access) ──► Event::subscribe
//! subscribe_all(g) ──────────────────────────────────────► all.subscribe
//!
//! trigger("a", data)
//!     ├─► channels["a"].trigger(&data)        (if "a" has a channel)
//!     └─► all.trigger(&Named { "a", data })   (always, afterwards)
//!
//! trigger_async("a", data)
//!     └─► [channels["a"] subscribers + all subscribers] ──► one counted join
//! ```
//!
//! ## Rules
//! - The registry lock guards only the name map; it is released before any
//!   channel is touched, so different names never contend.
//! - Channel creation happens under that lock: concurrent first subscribers to
//!   one name always share one channel.
//! - Names are never removed. Triggering an unknown name does not create it.
//! - `trigger` delivers to named subscribers first, then catch-all subscribers.
//!   `trigger_async` runs both groups together with no relative order.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::trace;

use super::named::Named;
use crate::config::Config;
use crate::error::TriggerError;
use crate::event::{self, Event, Job, Subscriber, Unsubscribe};

/// A set of named events sharing one payload type.
///
/// # Example
/// ```rust
/// use std::sync::{Arc, Mutex};
/// use eventline::Events;
///
/// let log = Arc::new(Mutex::new(Vec::new()));
/// let events = Events::<i32>::new();
///
/// let l = Arc::clone(&log);
/// let _s = events.on("e", move |n| l.lock().unwrap().push(format!("S {n}")));
/// let l = Arc::clone(&log);
/// let _m = events.subscribe_all(move |name, n| l.lock().unwrap().push(format!("M {name} {n}")));
///
/// events.trigger("e", 5);
///
/// assert_eq!(*log.lock().unwrap(), vec!["S 5", "M e 5"]);
/// ```
pub struct Events<T> {
    channels: Mutex<HashMap<Arc<str>, Event<T>>>,
    all: Event<Named<T>>,
    config: Arc<Config>,
}

impl<T: 'static> Events<T> {
    /// Creates an empty registry with the default [`Config`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an empty registry; every channel it creates shares `config`.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        let config = Arc::new(config);
        Self {
            channels: Mutex::new(HashMap::new()),
            all: Event::with_shared_config(Arc::clone(&config)),
            config,
        }
    }

    /// Subscribes `subscriber` to the event called `name`.
    pub fn on<F>(&self, name: &str, subscriber: F) -> Unsubscribe
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.event(name).subscribe(subscriber)
    }

    /// Subscribes `subscriber` to every event triggered on this registry.
    pub fn subscribe_all<F>(&self, subscriber: F) -> Unsubscribe
    where
        F: Fn(&str, &T) + Send + Sync + 'static,
    {
        self.all
            .subscribe(move |named: &Named<T>| subscriber(&*named.name, &named.data))
    }

    /// Subscribes `subscriber` to each event in `names`.
    ///
    /// With no names this is [`subscribe_all`](Self::subscribe_all). Otherwise
    /// the returned handle removes the subscriber from every listed event at
    /// once. A name listed twice is subscribed twice.
    pub fn subscribe_to<F, I>(&self, subscriber: F, names: I) -> Unsubscribe
    where
        F: Fn(&str, &T) + Send + Sync + 'static,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let names: Vec<Arc<str>> = names.into_iter().map(|n| Arc::from(n.as_ref())).collect();
        if names.is_empty() {
            return self.subscribe_all(subscriber);
        }

        let subscriber = Arc::new(subscriber);
        let handles = names
            .into_iter()
            .map(|name| {
                let f = Arc::clone(&subscriber);
                self.event(&name).subscribe(move |data: &T| f(&*name, data))
            })
            .collect();
        Unsubscribe::combine(handles)
    }

    /// Calls the subscribers of `name`, then every catch-all subscriber.
    ///
    /// A panicking subscriber propagates to the caller, as with
    /// [`Event::trigger`].
    pub fn trigger(&self, name: &str, data: T) {
        trace!(event = name, "trigger");
        if let Some(channel) = self.existing(name) {
            channel.trigger_ref(&data);
        }
        self.all.trigger(Named::new(name, data));
    }

    /// Runs the subscribers of `name` and every catch-all subscriber
    /// concurrently, returning once all of them have completed.
    ///
    /// Panic positions count the named subscribers first, then the catch-all ones.
    pub fn trigger_async(&self, name: &str, data: T) -> Result<(), TriggerError>
    where
        T: Sync,
    {
        let named = Named::new(name, data);
        let (direct, all) = self.snapshot(name);
        trace!(event = name, subscribers = direct.len() + all.len(), "trigger_async");

        let mut jobs: Vec<Job<'_>> = Vec::with_capacity(direct.len() + all.len());
        for subscriber in &direct {
            let data = &named.data;
            jobs.push(Box::new(move || subscriber(data)));
        }
        for subscriber in &all {
            let named = &named;
            jobs.push(Box::new(move || subscriber(named)));
        }
        event::run_scoped(&self.config, jobs)
    }

    /// Async counterpart of [`trigger_async`](Self::trigger_async) for tokio callers.
    ///
    /// # Panics
    /// Panics if polled outside a tokio runtime while there are subscribers to run.
    pub async fn trigger_spawned(&self, name: &str, data: T) -> Result<(), TriggerError>
    where
        T: Send + Sync,
    {
        let named = Arc::new(Named::new(name, data));
        let (direct, all) = self.snapshot(name);
        trace!(event = name, subscribers = direct.len() + all.len(), "trigger_spawned");

        let mut jobs: Vec<Job<'static>> = Vec::with_capacity(direct.len() + all.len());
        for subscriber in direct {
            let named = Arc::clone(&named);
            jobs.push(Box::new(move || subscriber(&named.data)));
        }
        for subscriber in all {
            let named = Arc::clone(&named);
            jobs.push(Box::new(move || subscriber(named.as_ref())));
        }
        event::run_blocking(jobs).await
    }

    /// Returns the channel backing `name`, creating it on first access.
    pub fn event(&self, name: &str) -> Event<T> {
        let mut channels = event::lock(&self.channels);
        if let Some(channel) = channels.get(name) {
            return channel.clone();
        }
        trace!(event = name, "channel created");
        let channel = Event::with_shared_config(Arc::clone(&self.config));
        channels.insert(Arc::from(name), channel.clone());
        channel
    }

    /// Returns the sorted names that have a backing channel.
    pub fn names(&self) -> Vec<String> {
        let channels = event::lock(&self.channels);
        let mut names: Vec<String> = channels.keys().map(|n| n.to_string()).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of live subscribers of `name` (0 for unknown names).
    pub fn subscriber_count(&self, name: &str) -> usize {
        self.existing(name).map_or(0, |channel| channel.len())
    }

    /// Returns the number of live catch-all subscribers.
    pub fn catch_all_count(&self) -> usize {
        self.all.len()
    }

    fn existing(&self, name: &str) -> Option<Event<T>> {
        event::lock(&self.channels).get(name).cloned()
    }

    fn snapshot(&self, name: &str) -> (Vec<Subscriber<T>>, Vec<Subscriber<Named<T>>>) {
        let direct = self
            .existing(name)
            .map(|channel| channel.snapshot())
            .unwrap_or_default();
        (direct, self.all.snapshot())
    }
}

impl<T: 'static> Default for Events<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Events<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = event::lock(&self.channels).len();
        f.debug_struct("Events")
            .field("names", &names)
            .field("all", &self.all)
            .finish()
    }
}
