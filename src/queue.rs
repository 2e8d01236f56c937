use std::num::NonZeroUsize;
use std::sync::Mutex;

use crate::item::{Prioritized, Priority};
use crate::semaphore::Semaphore;
use crate::utils::lock_or_die;

/* ---------- */

/// A bounded queue with two priority classes sharing a single capacity.
///
/// Items are stored in one of two FIFO ring buffers depending on their [`Priority`].
/// [`get`] always serves the urgent ring first: as long as an urgent item is queued,
/// it is returned before any normal item, however long the normal item has been waiting.
/// Normal items can therefore be delayed indefinitely under sustained urgent load.
///
/// Capacity is enforced by two counting semaphores, one counting free slots and one counting
/// occupied slots, across both rings combined. Both operations wait on their semaphore *before*
/// taking the ring lock and signal the complementary semaphore *after* releasing it,
/// so a blocked producer or consumer never holds the lock.
///
/// The queue is meant to be shared by reference between threads, e.g. with [`std::thread::scope`].
///
/// # Fatal errors
///
/// If one of the internal locks is poisoned, the error is logged and the process exits immediately.
///
/// # Examples
///
/// ```
/// # use prioq::{BoundedPriorityQueue, Item, Priority};
/// # use std::num::NonZeroUsize;
/// let queue = BoundedPriorityQueue::new(NonZeroUsize::new(4).unwrap());
///
/// queue.put(Item::new(1, Priority::Normal));
/// queue.put(Item::new(2, Priority::Urgent));
///
/// // The urgent item jumps ahead.
/// assert_eq!(queue.get().value(), Some(2));
/// assert_eq!(queue.get().value(), Some(1));
/// ```
///
/// [`get`]: BoundedPriorityQueue::get
#[derive(Debug)]
pub struct BoundedPriorityQueue<T> {
    capacity: NonZeroUsize,
    rings: Mutex<Rings<T>>,
    free: Semaphore,
    occupied: Semaphore,
}

impl<T: Prioritized> BoundedPriorityQueue<T> {
    /// Returns an empty queue holding at most `capacity` items.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            rings: Mutex::new(Rings {
                urgent: Ring::new(capacity.get()),
                normal: Ring::new(capacity.get()),
            }),
            free: Semaphore::new("free slots", capacity.get()),
            occupied: Semaphore::new("occupied slots", 0),
        }
    }

    /// Inserts `item`, blocking while the queue is full.
    ///
    /// The item is never dropped nor rejected.
    pub fn put(&self, item: T) {
        self.free.acquire();

        let priority = item.priority();
        let mut rings = self.lock();
        rings.ring_mut(priority).push(item);
        tracing::trace!(
            ?priority,
            urgent = rings.urgent.len(),
            normal = rings.normal.len(),
            "item queued"
        );
        drop(rings);

        self.occupied.release();
    }

    /// Removes the oldest urgent item, or the oldest normal item if no urgent one is queued.
    ///
    /// Blocks while the queue is empty.
    pub fn get(&self) -> T {
        self.occupied.acquire();

        let mut rings = self.lock();
        let priority = if rings.urgent.is_empty() {
            Priority::Normal
        } else {
            Priority::Urgent
        };

        let Some(item) = rings.ring_mut(priority).pop() else {
            crate::utils::fatal(
                "occupied slots",
                "a permit was granted but both rings are empty",
            )
        };
        tracing::trace!(
            ?priority,
            urgent = rings.urgent.len(),
            normal = rings.normal.len(),
            "item dequeued"
        );
        drop(rings);

        self.free.release();
        item
    }
}

impl<T> BoundedPriorityQueue<T> {
    /// Returns the maximum number of items the queue holds.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Returns the number of queued items, both classes combined.
    #[inline]
    pub fn len(&self) -> usize {
        let rings = self.lock();
        rings.urgent.len() + rings.normal.len()
    }

    /// Returns whether no item is queued.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of queued urgent items.
    #[inline]
    pub fn urgent_len(&self) -> usize {
        self.lock().urgent.len()
    }

    /// Returns the number of queued normal items.
    #[inline]
    pub fn normal_len(&self) -> usize {
        self.lock().normal.len()
    }

    /// Returns the count of the free-slots semaphore.
    ///
    /// While a `put` or a `get` is in flight, this may lag behind [`len`](Self::len).
    #[inline]
    pub fn free_permits(&self) -> usize {
        self.free.permits()
    }

    /// Returns the count of the occupied-slots semaphore.
    ///
    /// While a `put` or a `get` is in flight, this may lag behind [`len`](Self::len).
    #[inline]
    pub fn occupied_permits(&self) -> usize {
        self.occupied.permits()
    }

    #[inline]
    fn lock(&self) -> std::sync::MutexGuard<'_, Rings<T>> {
        lock_or_die(&self.rings, "priority queue rings")
    }
}

/* ---------- */

#[derive(Debug)]
struct Rings<T> {
    urgent: Ring<T>,
    normal: Ring<T>,
}

impl<T> Rings<T> {
    #[inline]
    fn ring_mut(&mut self, priority: Priority) -> &mut Ring<T> {
        match priority {
            Priority::Urgent => &mut self.urgent,
            Priority::Normal => &mut self.normal,
        }
    }
}

/// A fixed-size FIFO ring buffer.
///
/// Callers guarantee through the semaphores that `push` is never called when full
/// and `pop` is never called when empty.
#[derive(Debug)]
struct Ring<T> {
    slots: Box<[Option<T>]>,
    head: usize,
    tail: usize,
    len: usize,
}

impl<T> Ring<T> {
    fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn push(&mut self, item: T) {
        debug_assert!(self.len < self.slots.len(), "pushed into a full ring");

        self.slots[self.tail] = Some(item);
        self.tail = (self.tail + 1) % self.slots.len();
        self.len += 1;
    }

    fn pop(&mut self) -> Option<T> {
        let item = self.slots[self.head].take()?;

        self.head = (self.head + 1) % self.slots.len();
        self.len -= 1;
        Some(item)
    }
}

/* ---------- */
