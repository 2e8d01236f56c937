use std::thread::{Scope, ScopedJoinHandle};

use crate::settings::Settings;
use crate::worker::{Context, Worker};
use crate::Error;

/* ---------- */

/// A runtime running [`Workers`] on scoped threads.
///
/// Workers may borrow anything that outlives the scope, which is how producers and consumers share
/// a single queue without reference counting.
///
/// When dropped, a runtime waits for all its workers to complete.
///
/// [`Workers`]: crate::Worker
///
/// # Examples
///
/// ```
/// # use prioq::{ControlFlow, ScopedRuntime, Settings, Worker};
/// struct Greeter<'a>(&'a str);
/// impl Worker for Greeter<'_> {
///     fn on_update(&mut self) -> ControlFlow {
///         println!("Hello, {}!", self.0);
///         ControlFlow::Break
///     }
/// }
///
/// let name = String::from("Alice");
///
/// std::thread::scope(|scope| {
///     let mut runtime = ScopedRuntime::new(scope);
///
///     runtime
///         .launch_with_settings(Greeter(&name), Settings::new().name("greeter"))
///         .unwrap();
///
///     let joined = runtime.wait();
///     assert_eq!(joined[0].name(), Some("greeter"));
///     assert!(!joined[0].panicked());
/// });
/// ```
pub struct ScopedRuntime<'scope, 'env> {
    scope: &'scope Scope<'scope, 'env>,
    threads: Vec<ScopedJoinHandle<'scope, ()>>,
}

impl<'scope, 'env> ScopedRuntime<'scope, 'env> {
    /// Returns a new runtime bound to the `scope`.
    #[inline]
    pub fn new(scope: &'scope Scope<'scope, 'env>) -> Self {
        Self {
            scope,
            threads: Vec::new(),
        }
    }

    /// Returns the number of launched workers that haven't been joined yet.
    #[inline]
    pub fn len(&self) -> usize {
        self.threads.len()
    }

    /// Returns whether every launched worker has been joined.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    /// Runs a [`Worker`] in a new thread.
    #[inline]
    pub fn launch<W: Worker + 'scope>(&mut self, worker: W) -> Result<(), Error> {
        self.launch_with_settings(worker, Settings::default())
    }

    /// Runs a [`Worker`] in a new thread configured with `settings`.
    pub fn launch_with_settings<W: Worker + 'scope>(
        &mut self,
        mut worker: W,
        settings: Settings,
    ) -> Result<(), Error> {
        let thread = settings
            .into_builder()
            .spawn_scoped(self.scope, move || worker.run())?;

        self.threads.push(thread);
        Ok(())
    }

    /// Runs a [`Worker`] in a new thread configured with `settings` and pinned to the cpu `cores`.
    ///
    /// Pinning is best effort: if the affinity can't be set, the worker still runs, unpinned.
    pub fn launch_pinned_with_settings<W, C>(
        &mut self,
        mut worker: W,
        cores: C,
        settings: Settings,
    ) -> Result<(), Error>
    where
        W: Worker + 'scope,
        C: AsRef<[usize]> + Send + 'scope,
    {
        let thread = settings.into_builder().spawn_scoped(self.scope, move || {
            if let Err(err) = affinity::set_thread_affinity(cores) {
                tracing::debug!("failed to pin the worker thread: {err}");
            }
            worker.run()
        })?;

        self.threads.push(thread);
        Ok(())
    }

    /// Runs a [`Worker`] built from a [`Context`] in a new thread.
    ///
    /// The thread is configured with [`Context::settings`] and pinned with [`Context::core_pinning`].
    pub fn launch_from_context<W, C>(&mut self, ctx: C) -> Result<(), Error>
    where
        W: Worker + 'scope,
        C: Context<Target = W>,
    {
        let settings = ctx.settings();
        let cores = ctx.core_pinning();
        let worker = ctx.into_worker()?;

        match cores {
            Some(cores) => self.launch_pinned_with_settings(worker, cores, settings),
            None => self.launch_with_settings(worker, settings),
        }
    }

    /// Blocks until every launched worker has returned.
    ///
    /// Returns one [`Joined`] per worker, in launch order.
    pub fn wait(&mut self) -> Vec<Joined> {
        self.threads
            .drain(..)
            .map(|thread| {
                let name = thread.thread().name().map(str::to_owned);
                let panicked = thread.join().is_err();

                Joined { name, panicked }
            })
            .collect()
    }
}

impl Drop for ScopedRuntime<'_, '_> {
    fn drop(&mut self) {
        let _ = self.wait();
    }
}

/* ---------- */

/// Describes a worker thread joined by [`ScopedRuntime::wait`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Joined {
    name: Option<String>,
    panicked: bool,
}

impl Joined {
    /// Returns the worker's thread name.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns whether the worker panicked.
    #[inline]
    pub fn panicked(&self) -> bool {
        self.panicked
    }
}

/* ---------- */
