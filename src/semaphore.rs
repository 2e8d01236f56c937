use std::sync::{Condvar, Mutex};

use crate::utils::{lock_or_die, wait_while_or_die};

/* ---------- */

/// A counting semaphore built on a mutex and a condition variable.
///
/// [`acquire`] blocks while the count is zero then decrements it, [`release`] increments it
/// and wakes one waiter.
///
/// [`acquire`]: Semaphore::acquire
/// [`release`]: Semaphore::release
#[derive(Debug)]
pub(crate) struct Semaphore {
    name: &'static str,
    permits: Mutex<usize>,
    available: Condvar,
}

impl Semaphore {
    #[inline]
    pub(crate) fn new(name: &'static str, permits: usize) -> Self {
        Self {
            name,
            permits: Mutex::new(permits),
            available: Condvar::new(),
        }
    }

    pub(crate) fn acquire(&self) {
        let guard = lock_or_die(&self.permits, self.name);
        let mut permits = wait_while_or_die(&self.available, guard, self.name, |permits| {
            *permits == 0
        });

        *permits -= 1;
    }

    pub(crate) fn release(&self) {
        let mut permits = lock_or_die(&self.permits, self.name);
        *permits += 1;
        drop(permits);

        self.available.notify_one();
    }

    /// Returns the current count. Only meaningful once every thread using the semaphore is idle.
    #[inline]
    pub(crate) fn permits(&self) -> usize {
        *lock_or_die(&self.permits, self.name)
    }
}

/* ---------- */
