use crate::settings::Settings;
use crate::Error;

/* ---------- */

/// A task running on its own thread until it decides to stop.
///
/// Workers are defined by one main method, [`Worker::run`]. Its default implementation calls
/// [`Worker::on_start`] once, then [`Worker::on_update`] in a loop until it returns [`ControlFlow::Break`],
/// then [`Worker::on_stop`] once.
///
/// There is no way to stop a worker from the outside: producers stop after their quota,
/// consumers stop when they receive a sentinel.
///
/// # Examples
///
/// A worker that counts to 10 and stops:
///
/// ```
/// # use prioq::{ControlFlow, ScopedRuntime, Worker};
/// #[derive(Debug, Default)]
/// struct Counter {
///     count: usize
/// }
///
/// impl Worker for Counter {
///     fn on_update(&mut self) -> ControlFlow {
///         self.count += 1;
///
///         if self.count >= 10 {
///             return ControlFlow::Break;
///         }
///
///         ControlFlow::Continue
///     }
/// }
///
/// std::thread::scope(|scope| {
///     let mut runtime = ScopedRuntime::new(scope);
///
///     runtime.launch(Counter::default()).unwrap();
///     runtime.wait();
/// });
/// ```
pub trait Worker: Send {
    /// Called once before the first [`Worker::on_update`]. Does nothing by default.
    #[inline]
    fn on_start(&mut self) {}

    /// Does one unit of work.
    ///
    /// By default, this method just returns [`ControlFlow::Break`].
    #[inline]
    fn on_update(&mut self) -> ControlFlow {
        ControlFlow::Break
    }

    /// Called once after the loop ended. Does nothing by default.
    #[inline]
    fn on_stop(&mut self) {}

    /// Main worker loop, called on the worker's own thread by the runtime.
    #[inline]
    fn run(&mut self) {
        self.on_start();

        while let ControlFlow::Continue = self.on_update() {}

        self.on_stop();
    }
}

/* ---------- */

/// Builds a worker right before launching it with [`ScopedRuntime::launch_from_context`].
///
/// Task descriptors are turned into workers through this trait, which also tells
/// the runtime how to configure the worker's thread.
///
/// [`ScopedRuntime::launch_from_context`]: crate::ScopedRuntime::launch_from_context
pub trait Context {
    /// The type of [`Worker`] built from this context.
    type Target: Worker;

    /// Consumes `self` to build the targeted [`Worker`].
    fn into_worker(self) -> Result<Self::Target, Error>;

    /// Returns the [`Settings`] of the worker's thread.
    ///
    /// By default, it returns default thread settings.
    #[inline]
    fn settings(&self) -> Settings {
        Settings::default()
    }

    /// Returns some cpu IDs to pin the worker's thread to.
    ///
    /// By default, it returns `None`.
    #[inline]
    fn core_pinning(&self) -> Option<Vec<usize>> {
        None
    }
}

/* ---------- */

/// Defines the control flow of [`Workers`].
///
/// [`Workers`]: crate::Worker
#[derive(Debug, PartialEq)]
pub enum ControlFlow {
    /// Keeps looping.
    Continue,
    /// Leaves the loop.
    Break,
}

/* ---------- */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn hooks_order() {
        let mut worker = RecordingWorker::new(3);
        worker.run();

        assert_eq!(worker.events, ["start", "update", "update", "update", "stop"]);
    }

    #[test]
    fn default_breaks_immediately() {
        struct Idle;
        impl Worker for Idle {}

        assert_eq!(Idle.on_update(), ControlFlow::Break);
        Idle.run();
    }
}
