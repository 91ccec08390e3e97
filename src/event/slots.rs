//! # Generation-tagged slot list.
//!
//! [`Slots`] stores subscribers in an arena whose slots are threaded into a
//! doubly-linked list. Links give insertion order, the arena gives O(1)
//! removal by [`Key`], and generations make a key unusable once its slot
//! has been reused.
//!
//! ## Layout
//! ```text
//!  head                                  tail
//!   │                                     │
//!   ▼                                     ▼
//! [0 g0] ◄──► [3 g1] ◄──► [1 g0] ◄──► [4 g0]      free: [2]
//! ```
//!
//! ## Rules
//! - `push_back` reuses a free slot when one exists and bumps its generation.
//! - `remove` with a stale or already-removed key is a no-op.
//! - Removing one key never invalidates another key.

/// Stable identity of one entry in [`Slots`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Key {
    index: usize,
    generation: u64,
}

struct Slot<V> {
    generation: u64,
    value: Option<V>,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Insertion-ordered arena with O(1) keyed removal.
pub(crate) struct Slots<V> {
    slots: Vec<Slot<V>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<V> Slots<V> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Appends `value` after the current tail and returns its key.
    pub(crate) fn push_back(&mut self, value: V) -> Key {
        let prev = self.tail;
        let index = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.generation = slot.generation.wrapping_add(1);
                slot.value = Some(value);
                slot.prev = prev;
                slot.next = None;
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    value: Some(value),
                    prev,
                    next: None,
                });
                self.slots.len() - 1
            }
        };

        match prev {
            Some(tail) => self.slots[tail].next = Some(index),
            None => self.head = Some(index),
        }
        self.tail = Some(index);
        self.len += 1;

        Key {
            index,
            generation: self.slots[index].generation,
        }
    }

    /// Returns the live value behind `key`, if any.
    pub(crate) fn get(&self, key: Key) -> Option<&V> {
        self.slots
            .get(key.index)
            .filter(|slot| slot.generation == key.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    /// Unlinks the entry behind `key` and returns its value.
    ///
    /// Returns `None` for stale or already-removed keys.
    pub(crate) fn remove(&mut self, key: Key) -> Option<V> {
        let slot = self.slots.get_mut(key.index)?;
        if slot.generation != key.generation {
            return None;
        }
        let value = slot.value.take()?;
        let prev = slot.prev.take();
        let next = slot.next.take();

        match prev {
            Some(prev) => self.slots[prev].next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.slots[next].prev = prev,
            None => self.tail = prev,
        }

        self.free.push(key.index);
        self.len -= 1;
        Some(value)
    }

    /// Iterates live entries in insertion order.
    pub(crate) fn iter(&self) -> Iter<'_, V> {
        Iter {
            slots: self,
            cursor: self.head,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }
}

/// Insertion-order iterator over `(Key, &V)`.
pub(crate) struct Iter<'a, V> {
    slots: &'a Slots<V>,
    cursor: Option<usize>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (Key, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor?;
        let slot = &self.slots.slots[index];
        self.cursor = slot.next;
        let value = slot.value.as_ref()?;
        Some((
            Key {
                index,
                generation: slot.generation,
            },
            value,
        ))
    }
}
