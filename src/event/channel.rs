//! # Single event channel.
//!
//! [`Event<T>`] keeps an insertion-ordered list of subscribers for one logical
//! event and fans a payload out to them.
//!
//! ## Architecture
//! ```text
//! subscribe(f) ──► lock ──► Slots::push_back ──► unlock ──► Unsubscribe(Weak, Key)
//!
//! trigger(&payload)
//!     │
//!     ├─ lock ─► snapshot keys ─► unlock
//!     └─ for key in snapshot:
//!           lock ─► live? clone Arc ─► unlock ─► subscriber(&payload)
//!
//! trigger_async(&payload)
//!     │
//!     ├─ lock ─► snapshot subscribers ─► unlock
//!     └─ one scoped thread per subscriber ─► join all
//! ```
//!
//! ## Rules
//! - The mutex is held only for slot manipulation, never while a subscriber runs,
//!   so subscribers may subscribe, unsubscribe or trigger again without deadlock.
//! - `trigger` visits the subscribers that were live when it started, in
//!   insertion order. A subscriber removed before its turn is skipped.
//!   Subscribers added during the pass are **not** visited by that pass.
//! - `trigger` is fail-fast: a panicking subscriber unwinds into the caller and
//!   the rest of that pass is skipped. The channel stays usable.
//! - `trigger_async` and `trigger_spawned` isolate panics per subscriber and
//!   report them through [`TriggerError`].

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::trace;

use super::fanout::{self, Job};
use super::handle::Unsubscribe;
use super::slots::{Key, Slots};
use crate::config::Config;
use crate::error::TriggerError;

/// Type-erased subscriber callback.
pub(crate) type Subscriber<T> = Arc<dyn Fn(&T) + Send + Sync>;

type Table<T> = Mutex<Slots<Subscriber<T>>>;

pub(crate) fn lock<V>(table: &Mutex<V>) -> MutexGuard<'_, V> {
    table.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A typed event that subscribers can attach to and publishers can trigger.
///
/// Cloning an `Event` gives another handle to the **same** subscriber list.
///
/// # Example
/// ```rust
/// use std::sync::{Arc, Mutex};
/// use eventline::Event;
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let event = Event::<u32>::new();
///
/// let s = Arc::clone(&seen);
/// let handle = event.subscribe(move |n| s.lock().unwrap().push(*n));
///
/// event.trigger(1);
/// handle.unsubscribe();
/// event.trigger(2);
///
/// assert_eq!(*seen.lock().unwrap(), vec![1]);
/// ```
pub struct Event<T> {
    table: Arc<Table<T>>,
    config: Arc<Config>,
}

impl<T> Clone for Event<T> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
            config: Arc::clone(&self.config),
        }
    }
}

impl<T: 'static> Event<T> {
    /// Creates an event with no subscribers and the default [`Config`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an event with no subscribers using `config` for concurrent fan-out.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self::with_shared_config(Arc::new(config))
    }

    pub(crate) fn with_shared_config(config: Arc<Config>) -> Self {
        Self {
            table: Arc::new(Mutex::new(Slots::new())),
            config,
        }
    }

    /// Appends `subscriber` to the end of the delivery order.
    ///
    /// Never fails. The returned handle is the only way to remove it.
    pub fn subscribe<F>(&self, subscriber: F) -> Unsubscribe
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let subscriber: Subscriber<T> = Arc::new(subscriber);
        let (key, count) = {
            let mut table = lock(&self.table);
            let key = table.push_back(subscriber);
            (key, table.len())
        };
        trace!(subscribers = count, "subscribed");

        let table = Arc::downgrade(&self.table);
        Unsubscribe::new(move || {
            let Some(table) = table.upgrade() else {
                return;
            };
            // Dropped after the guard: the subscriber's captures may touch this channel.
            let _removed = {
                let mut table = lock(&table);
                let removed = table.remove(key);
                if removed.is_some() {
                    trace!(subscribers = table.len(), "unsubscribed");
                }
                removed
            };
        })
    }

    /// Calls every subscriber in insertion order with `payload`.
    ///
    /// Blocks until the last subscriber returns. A panic in a subscriber
    /// propagates to the caller and skips the remaining subscribers.
    pub fn trigger(&self, payload: T) {
        self.trigger_ref(&payload);
    }

    /// Same as [`trigger`](Self::trigger) for a borrowed payload.
    pub fn trigger_ref(&self, payload: &T) {
        let keys = self.keys();
        trace!(subscribers = keys.len(), "trigger");

        for key in keys {
            if let Some(subscriber) = self.live(key) {
                subscriber(payload);
            }
        }
    }

    /// Calls every subscriber on its own thread and waits for all of them.
    ///
    /// No ordering between subscribers. A panicking subscriber does not stop
    /// the others; panics are collected into
    /// [`TriggerError::SubscribersPanicked`] once every thread has been joined.
    ///
    /// # Example
    /// ```rust
    /// use std::sync::Arc;
    /// use std::sync::atomic::{AtomicUsize, Ordering};
    /// use eventline::Event;
    ///
    /// let total = Arc::new(AtomicUsize::new(0));
    /// let event = Event::<usize>::new();
    /// for _ in 0..4 {
    ///     let t = Arc::clone(&total);
    ///     let _ = event.subscribe(move |n| { t.fetch_add(*n, Ordering::SeqCst); });
    /// }
    ///
    /// event.trigger_async(&10).unwrap();
    /// assert_eq!(total.load(Ordering::SeqCst), 40);
    /// ```
    pub fn trigger_async(&self, payload: &T) -> Result<(), TriggerError>
    where
        T: Sync,
    {
        let subscribers = self.snapshot();
        trace!(subscribers = subscribers.len(), "trigger_async");

        let jobs: Vec<Job<'_>> = subscribers
            .iter()
            .map(|subscriber| Box::new(move || subscriber(payload)) as Job<'_>)
            .collect();
        fanout::run_scoped(&self.config, jobs)
    }

    /// Async counterpart of [`trigger_async`](Self::trigger_async) for tokio callers.
    ///
    /// Each subscriber runs on tokio's blocking pool; the returned future
    /// completes once all of them have finished.
    ///
    /// # Panics
    /// Panics if polled outside a tokio runtime (e.g. under
    /// `futures::executor::block_on`) while there are subscribers to run.
    pub async fn trigger_spawned(&self, payload: T) -> Result<(), TriggerError>
    where
        T: Send + Sync,
    {
        let payload = Arc::new(payload);
        let subscribers = self.snapshot();
        trace!(subscribers = subscribers.len(), "trigger_spawned");

        let jobs: Vec<Job<'static>> = subscribers
            .into_iter()
            .map(|subscriber| {
                let payload = Arc::clone(&payload);
                Box::new(move || subscriber(payload.as_ref())) as Job<'static>
            })
            .collect();
        fanout::run_blocking(jobs).await
    }

    /// Returns the number of live subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.table).len()
    }

    /// Returns `true` if nothing is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live subscribers in delivery order.
    pub(crate) fn snapshot(&self) -> Vec<Subscriber<T>> {
        lock(&self.table)
            .iter()
            .map(|(_, subscriber)| Arc::clone(subscriber))
            .collect()
    }

    fn keys(&self) -> Vec<Key> {
        lock(&self.table).iter().map(|(key, _)| key).collect()
    }

    fn live(&self, key: Key) -> Option<Subscriber<T>> {
        lock(&self.table).get(key).cloned()
    }
}

impl<T: 'static> Default for Event<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Event<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("subscribers", &lock(&self.table).len())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Barrier, OnceLock};
    use std::thread;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) -> Box<dyn Fn(&u32) + Send + Sync>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let l = Arc::clone(&log);
        let make = move |tag: &str| {
            let l = Arc::clone(&l);
            let tag = tag.to_string();
            Box::new(move |n: &u32| l.lock().unwrap().push(format!("{tag}:{n}")))
                as Box<dyn Fn(&u32) + Send + Sync>
        };
        (log, make)
    }

    fn entries(log: &Mutex<Vec<String>>) -> Vec<String> {
        log.lock().unwrap().clone()
    }

    #[test]
    fn test_trigger_in_insertion_order() {
        let event = Event::<u32>::new();
        let (log, make) = recorder();
        let _a = event.subscribe(make("a"));
        let _b = event.subscribe(make("b"));
        let _c = event.subscribe(make("c"));

        event.trigger(1);
        event.trigger(2);

        assert_eq!(entries(&log), vec!["a:1", "b:1", "c:1", "a:2", "b:2", "c:2"]);
    }

    #[test]
    fn test_trigger_without_subscribers_is_noop() {
        let event = Event::<u32>::new();
        event.trigger(7);
        assert!(event.trigger_async(&7).is_ok());
        assert!(event.is_empty());
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let event = Event::<u32>::new();
        let (log, make) = recorder();
        let s1 = event.subscribe(make("s1"));

        event.trigger(1);
        s1.unsubscribe();
        event.trigger(2);

        assert_eq!(entries(&log), vec!["s1:1"]);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let event = Event::<u32>::new();
        let (log, make) = recorder();
        let a = event.subscribe(make("a"));
        let _b = event.subscribe(make("b"));

        for _ in 0..3 {
            a.unsubscribe();
        }
        event.trigger(1);

        assert_eq!(event.len(), 1);
        assert_eq!(entries(&log), vec!["b:1"]);
    }

    #[test]
    fn test_self_unsubscribe_during_trigger() {
        let event = Event::<u32>::new();
        let (log, make) = recorder();
        let own: Arc<OnceLock<Unsubscribe>> = Arc::new(OnceLock::new());

        let o = Arc::clone(&own);
        let l = Arc::clone(&log);
        let s1 = event.subscribe(move |n| {
            l.lock().unwrap().push(format!("s1:{n}"));
            if let Some(handle) = o.get() {
                handle.unsubscribe();
            }
        });
        own.set(s1).expect("handle set twice");
        let _s2 = event.subscribe(make("s2"));

        event.trigger(1);
        event.trigger(2);

        assert_eq!(entries(&log), vec!["s1:1", "s2:1", "s2:2"]);
    }

    #[test]
    fn test_removed_before_its_turn_is_skipped() {
        let event = Event::<u32>::new();
        let (log, make) = recorder();
        let victim: Arc<OnceLock<Unsubscribe>> = Arc::new(OnceLock::new());

        let v = Arc::clone(&victim);
        let _first = event.subscribe(move |_| {
            if let Some(handle) = v.get() {
                handle.unsubscribe();
            }
        });
        let second = event.subscribe(make("second"));
        let _third = event.subscribe(make("third"));
        victim.set(second).expect("handle set twice");

        event.trigger(1);

        assert_eq!(entries(&log), vec!["third:1"]);
    }

    #[test]
    fn test_subscribe_during_trigger_waits_for_next_pass() {
        let event = Event::<u32>::new();
        let (log, make) = recorder();
        let added = Arc::new(AtomicUsize::new(0));

        let e = event.clone();
        let a = Arc::clone(&added);
        let l = Arc::clone(&log);
        let _adder = event.subscribe(move |_| {
            if a.fetch_add(1, Ordering::SeqCst) == 0 {
                let l = Arc::clone(&l);
                let _late = e.subscribe(move |n| l.lock().unwrap().push(format!("late:{n}")));
            }
        });
        let _tail = event.subscribe(make("tail"));

        event.trigger(1);
        event.trigger(2);

        assert_eq!(entries(&log), vec!["tail:1", "tail:2", "late:2"]);
    }

    #[test]
    fn test_reentrant_trigger_does_not_deadlock() {
        let event = Event::<u32>::new();
        let depth = Arc::new(AtomicUsize::new(0));

        let e = event.clone();
        let d = Arc::clone(&depth);
        let _recursive = event.subscribe(move |n| {
            d.fetch_add(1, Ordering::SeqCst);
            if *n > 0 {
                e.trigger(n - 1);
            }
        });

        event.trigger(3);
        assert_eq!(depth.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_trigger_panic_propagates_and_channel_survives() {
        let event = Event::<u32>::new();
        let (log, make) = recorder();
        let _boom = event.subscribe(|n| {
            if *n == 1 {
                panic!("first payload rejected");
            }
        });
        let _after = event.subscribe(make("after"));

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| event.trigger(1)));
        assert!(result.is_err());
        assert!(entries(&log).is_empty());

        event.trigger(2);
        assert_eq!(entries(&log), vec!["after:2"]);
    }

    #[test]
    fn test_trigger_async_reaches_everyone_before_return() {
        let event = Event::<usize>::new();
        let count = Arc::new(AtomicUsize::new(0));
        let mut handles = Vec::new();
        for _ in 0..10 {
            let c = Arc::clone(&count);
            handles.push(event.subscribe(move |_| {
                thread::sleep(std::time::Duration::from_millis(5));
                c.fetch_add(1, Ordering::SeqCst);
            }));
        }

        event.trigger_async(&0).expect("fan-out failed");
        assert_eq!(count.load(Ordering::SeqCst), 10);

        handles[0].unsubscribe();
        event.trigger_async(&0).expect("fan-out failed");
        assert_eq!(count.load(Ordering::SeqCst), 19);
    }

    #[test]
    fn test_trigger_async_runs_concurrently() {
        let event = Event::<u32>::new();
        let barrier = Arc::new(Barrier::new(3));
        for _ in 0..3 {
            let b = Arc::clone(&barrier);
            let _ = event.subscribe(move |_| {
                b.wait();
            });
        }

        // Would hang if subscribers ran one after another.
        event.trigger_async(&0).expect("fan-out failed");
    }

    #[test]
    fn test_trigger_async_isolates_panics() {
        let event = Event::<u32>::new();
        let count = Arc::new(AtomicUsize::new(0));
        for i in 0..4 {
            let c = Arc::clone(&count);
            let _ = event.subscribe(move |_| {
                if i == 2 {
                    panic!("subscriber two failed");
                }
                c.fetch_add(1, Ordering::SeqCst);
            });
        }

        let err = event.trigger_async(&0).unwrap_err();

        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert_eq!(err.as_label(), "trigger_subscribers_panicked");
        assert_eq!(err.panics().len(), 1);
        assert_eq!(err.panics()[0].position, 2);
        assert_eq!(err.panics()[0].message, "subscriber two failed");
    }

    #[test]
    fn test_concurrent_subscribe_unsubscribe_trigger() {
        let event = Event::<u32>::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(4));

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let e = event.clone();
                let h = Arc::clone(&hits);
                let b = Arc::clone(&barrier);
                thread::spawn(move || {
                    b.wait();
                    for i in 0..100 {
                        let h = Arc::clone(&h);
                        let handle = e.subscribe(move |_| {
                            h.fetch_add(1, Ordering::SeqCst);
                        });
                        e.trigger(i);
                        handle.unsubscribe();
                    }
                })
            })
            .collect();
        for w in workers {
            w.join().expect("worker panicked");
        }

        assert!(event.is_empty());
        // Each worker's own subscriber is live during its own trigger.
        assert!(hits.load(Ordering::SeqCst) >= 400);
    }

    #[test]
    fn test_unsubscribe_drops_subscriber_outside_lock() {
        struct Guard {
            event: Event<u32>,
            seen: Arc<AtomicUsize>,
        }

        impl Drop for Guard {
            fn drop(&mut self) {
                self.seen.store(self.event.len() + 1, Ordering::SeqCst);
            }
        }

        let event = Event::<u32>::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let guard = Guard {
            event: event.clone(),
            seen: Arc::clone(&seen),
        };
        let handle = event.subscribe(move |_| {
            let _keep = &guard;
        });

        let (tx, rx) = std::sync::mpsc::channel();
        thread::spawn(move || {
            handle.unsubscribe();
            let _ = tx.send(());
        });

        rx.recv_timeout(std::time::Duration::from_secs(2))
            .expect("unsubscribe did not finish");
        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert!(event.is_empty());
    }

    #[test]
    fn test_handle_outliving_event_is_harmless() {
        let event = Event::<u32>::new();
        let handle = event.subscribe(|_| {});
        drop(event);
        handle.unsubscribe();
        assert!(handle.is_unsubscribed());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_trigger_spawned_joins_all() {
        let event = Event::<String>::new();
        let count = Arc::new(AtomicUsize::new(0));
        for _ in 0..5 {
            let c = Arc::clone(&count);
            let _ = event.subscribe(move |s: &String| {
                c.fetch_add(s.len(), Ordering::SeqCst);
            });
        }

        event
            .trigger_spawned("abc".to_string())
            .await
            .expect("fan-out failed");
        assert_eq!(count.load(Ordering::SeqCst), 15);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_trigger_spawned_isolates_panics() {
        let event = Event::<u32>::new();
        let count = Arc::new(AtomicUsize::new(0));
        let _boom = event.subscribe(|_| panic!("spawned failure"));
        let c = Arc::clone(&count);
        let _ok = event.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        let err = event.trigger_spawned(1).await.unwrap_err();
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(err.panics()[0].position, 0);
    }
}
