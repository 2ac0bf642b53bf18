//! Where guarded operations run.

use std::future::Future;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::error::{Result, StoreError};

/// Runtime handle that guarded operations are spawned onto.
///
/// Holders never run operations on the caller's task; the dispatcher decides
/// which runtime executes them (typically a multi-threaded IO runtime).
#[derive(Debug, Clone)]
pub struct Dispatcher {
    handle: Handle,
}

impl Dispatcher {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Dispatcher for the runtime the caller is running in.
    ///
    /// # Errors
    /// Returns [`StoreError::NoRuntime`] outside a tokio runtime.
    pub fn current() -> Result<Self> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|_| StoreError::NoRuntime)
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    pub(crate) fn spawn<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.handle.spawn(future)
    }
}
