/// Errors returned when setting up or launching a run.
///
/// Failures of the synchronization primitives during a run are not part of this type:
/// they are fatal and terminate the process, see [`BoundedPriorityQueue`].
///
/// [`BoundedPriorityQueue`]: crate::BoundedPriorityQueue
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A [`Context`] could not build its worker.
    ///
    /// [`Context`]: crate::Context
    #[error("invalid context: {0}")]
    InvalidContext(String),

    /// The OS refused to spawn a worker thread.
    #[error(transparent)]
    ThreadStart(#[from] std::io::Error),
}

impl Error {
    #[inline]
    pub(crate) fn config<T: ToString>(reason: T) -> Self {
        Self::InvalidConfig(reason.to_string())
    }

    #[inline]
    pub(crate) fn context<T: ToString>(reason: T) -> Self {
        Self::InvalidContext(reason.to_string())
    }
}
