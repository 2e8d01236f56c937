use std::fmt::Display;
use std::sync::{Condvar, Mutex, MutexGuard};

/* ---------- */

/// Logs `what` failed and terminates the process.
///
/// A poisoned lock means another thread panicked halfway through mutating shared state.
/// There is no state to safely continue from, so in-flight tasks are not cleaned up.
#[cold]
pub(crate) fn fatal(what: &str, err: impl Display) -> ! {
    tracing::error!("{what}: {err}");
    std::process::exit(1)
}

/// Locks `mutex`, terminating the process if the lock is poisoned.
#[inline]
pub(crate) fn lock_or_die<'a, T>(mutex: &'a Mutex<T>, what: &str) -> MutexGuard<'a, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(err) => fatal(what, err),
    }
}

/// Blocks on `condvar` until `condition` returns `false`, terminating the process if the lock is poisoned.
#[inline]
pub(crate) fn wait_while_or_die<'a, T, F>(
    condvar: &Condvar,
    guard: MutexGuard<'a, T>,
    what: &str,
    condition: F,
) -> MutexGuard<'a, T>
where
    F: FnMut(&mut T) -> bool,
{
    match condvar.wait_while(guard, condition) {
        Ok(guard) => guard,
        Err(err) => fatal(what, err),
    }
}
