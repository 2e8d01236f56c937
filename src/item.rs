use std::fmt::{Display, Formatter, Result};
use std::time::Instant;

/* ---------- */

/// The value the sentinel was historically encoded as.
///
/// Producers draw values from `0..=999`, so this never collides with real work.
/// Sentinels are a distinct [`Payload`] case, this constant only exists for display purposes.
pub const SENTINEL_VALUE: i32 = -1;

/// Upper bound (exclusive) of the values drawn by producers.
pub const VALUE_RANGE_END: i32 = 1000;

/* ---------- */

/// The two priority classes of the queue.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    /// Served only when no urgent item is queued.
    #[default]
    Normal,
    /// Always served before normal items.
    Urgent,
}

/// Types that can be stored in a [`BoundedPriorityQueue`].
///
/// [`BoundedPriorityQueue`]: crate::BoundedPriorityQueue
pub trait Prioritized {
    /// The class the value is queued in.
    fn priority(&self) -> Priority;
}

/* ---------- */

/// What an [`Item`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    /// A unit of real work.
    Value(i32),
    /// Tells the consumer that receives it to stop.
    Sentinel,
}

/// A unit of work flowing from producers to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item {
    payload: Payload,
    priority: Priority,
    enqueued_at: Instant,
}

impl Item {
    /// Returns a new item carrying `value`, timestamped now.
    #[inline]
    pub fn new(value: i32, priority: Priority) -> Self {
        Self::with_priority(Payload::Value(value), priority)
    }

    /// Returns a new sentinel, timestamped now.
    #[inline]
    pub fn sentinel() -> Self {
        Self::with_priority(Payload::Sentinel, Priority::Normal)
    }

    /// Returns a new item carrying `payload`, timestamped now.
    ///
    /// Sentinels are always [`Priority::Normal`], whatever `priority` says.
    #[inline]
    pub fn with_priority(payload: Payload, priority: Priority) -> Self {
        let priority = match payload {
            Payload::Sentinel => Priority::Normal,
            Payload::Value(_) => priority,
        };

        Self {
            payload,
            priority,
            enqueued_at: Instant::now(),
        }
    }

    /// Returns the item's payload.
    #[inline]
    pub fn payload(&self) -> Payload {
        self.payload
    }

    /// Returns the carried value, or `None` for sentinels.
    #[inline]
    pub fn value(&self) -> Option<i32> {
        match self.payload {
            Payload::Value(value) => Some(value),
            Payload::Sentinel => None,
        }
    }

    /// Returns whether this item is a sentinel.
    #[inline]
    pub fn is_sentinel(&self) -> bool {
        self.payload == Payload::Sentinel
    }

    /// Returns when the item was created.
    #[inline]
    pub fn enqueued_at(&self) -> Instant {
        self.enqueued_at
    }
}

impl Prioritized for Item {
    #[inline]
    fn priority(&self) -> Priority {
        self.priority
    }
}

impl Display for Payload {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::Value(value) => write!(f, "{value}"),
            Self::Sentinel => write!(f, "sentinel ({SENTINEL_VALUE})"),
        }
    }
}

/* ---------- */
