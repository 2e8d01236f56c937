use std::fmt::{Debug, Formatter, Result};
use std::thread::Builder;

/* ---------- */

/// Configures the thread a task runs on.
///
/// Producers and consumers get a thread named after their role and identity,
/// e.g. `producer-1` or `consumer-3`, which is what [`Joined::name`] reports once the thread is joined.
///
/// [`Joined::name`]: crate::Joined::name
pub struct Settings {
    name: Option<String>,
}

impl Settings {
    /// Returns settings for an unnamed thread.
    #[inline]
    pub fn new() -> Self {
        Self { name: None }
    }

    /// Returns settings for a thread named `{role}-{id}`.
    #[inline]
    pub fn for_task(role: &str, id: usize) -> Self {
        Self::new().name(format!("{role}-{id}"))
    }

    /// Sets the thread's name.
    ///
    /// The name must not contains null bytes (`\0`).
    #[inline]
    pub fn name<T: ToString>(mut self, name: T) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Returns the thread name, if any.
    #[inline]
    pub fn thread_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[inline]
    pub(crate) fn into_builder(self) -> Builder {
        let builder = Builder::new();
        match self.name {
            Some(name) => builder.name(name),
            None => builder,
        }
    }
}

impl Default for Settings {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Settings {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_struct("Settings")
            .field("name", &self.name)
            .finish()
    }
}

/* ---------- */
