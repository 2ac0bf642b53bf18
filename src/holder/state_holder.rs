use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::config::StoreConfig;
use crate::dispatch::Dispatcher;
use crate::error::{Result, StoreError};
use crate::guard::{self, FailureHandler, GuardedTask, IgnoreFailures, OperationFailure};
use crate::mvi::State;
use crate::scope::ScopeHandle;

use super::stream::StateStream;

/// Result of an accepted update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// The reducer produced a new value; observers were notified.
    Applied { version: u64 },
    /// The reducer returned a value equal to the current one; nothing changed.
    Unchanged { version: u64 },
}

impl Commit {
    /// Version current after the update.
    pub fn version(&self) -> u64 {
        match self {
            Commit::Applied { version } | Commit::Unchanged { version } => *version,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Commit::Applied { .. })
    }
}

struct Slot<S> {
    value: S,
    version: u64,
    observers: Vec<UnboundedSender<S>>,
}

struct Shared<S: State> {
    slot: Mutex<Slot<S>>,
    scope: ScopeHandle,
    dispatcher: Dispatcher,
    failure_handler: Arc<dyn FailureHandler<S>>,
    trace_commits: bool,
    next_task_id: AtomicU64,
}

/// Single-writer, multi-reader container for one current state value.
///
/// All mutation goes through [`update`](Self::update), which holds the slot
/// lock while the reducer runs, so concurrent updates are applied one after
/// another and each reducer sees the result of the previous commit. Observers
/// are notified under the same lock and therefore receive commits in the
/// order they were made.
///
/// Reducers must not call back into the same holder; the slot lock is not
/// reentrant.
pub struct StateHolder<S: State> {
    shared: Arc<Shared<S>>,
}

impl<S: State> Clone for StateHolder<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S: State> StateHolder<S> {
    /// Create a holder on the current runtime with default settings.
    ///
    /// # Errors
    /// Returns [`StoreError::NoRuntime`] outside a tokio runtime.
    pub fn new<I>(scope: ScopeHandle, init: I) -> Result<Self>
    where
        I: FnOnce() -> S,
    {
        Self::builder(scope, init).build()
    }

    pub fn builder<I>(scope: ScopeHandle, init: I) -> StateHolderBuilder<S, I>
    where
        I: FnOnce() -> S,
    {
        StateHolderBuilder {
            scope,
            init,
            dispatcher: None,
            failure_handler: Arc::new(IgnoreFailures),
            trace_commits: false,
        }
    }

    /// The most recently committed state.
    pub fn current(&self) -> S {
        self.shared.slot.lock().value.clone()
    }

    /// Commit number of [`current`](Self::current); the initial value is 0.
    pub fn version(&self) -> u64 {
        self.shared.slot.lock().version
    }

    pub fn scope(&self) -> &ScopeHandle {
        &self.shared.scope
    }

    /// Subscribe to the current state and every later commit.
    ///
    /// Each call starts a fresh sequence. Subscribing after the scope has
    /// closed yields an empty stream.
    ///
    /// Commits are never skipped, so every commit is queued for every live
    /// stream until it is read. A stream that is kept alive but never polled
    /// grows without bound; poll it steadily or drop it.
    pub fn observe(&self) -> StateStream<S> {
        let (sender, receiver) = mpsc::unbounded_channel();
        {
            let mut slot = self.shared.slot.lock();
            if !self.shared.scope.is_closed() && sender.send(slot.value.clone()).is_ok() {
                slot.observers.push(sender);
                tracing::trace!(
                    version = slot.version,
                    observers = slot.observers.len(),
                    "observer subscribed"
                );
            }
        }
        StateStream::new(receiver, self.shared.scope.clone())
    }

    /// Number of live observer streams.
    pub fn observer_count(&self) -> usize {
        let mut slot = self.shared.slot.lock();
        slot.observers.retain(|sender| !sender.is_closed());
        slot.observers.len()
    }

    /// Apply `reducer` to the current state and commit the result.
    ///
    /// A panicking reducer propagates to the caller and leaves the state
    /// untouched.
    ///
    /// # Errors
    /// Returns [`StoreError::Closed`] once the owning scope has ended; the
    /// reducer is not invoked.
    pub fn update<F>(&self, reducer: F) -> Result<Commit>
    where
        F: FnOnce(&S) -> S,
    {
        let mut slot = self.shared.slot.lock();
        if self.shared.scope.is_closed() {
            return Err(StoreError::Closed);
        }
        let next = reducer(&slot.value);
        Ok(self.shared.commit(&mut slot, next))
    }

    /// Like [`update`](Self::update), but the reducer may reject the change.
    ///
    /// A reducer error is returned as `Ok(Err(e))` and nothing is committed.
    ///
    /// # Errors
    /// Returns [`StoreError::Closed`] once the owning scope has ended.
    pub fn try_update<F, E>(&self, reducer: F) -> Result<std::result::Result<Commit, E>>
    where
        F: FnOnce(&S) -> std::result::Result<S, E>,
    {
        let mut slot = self.shared.slot.lock();
        if self.shared.scope.is_closed() {
            return Err(StoreError::Closed);
        }
        Ok(reducer(&slot.value).map(|next| self.shared.commit(&mut slot, next)))
    }

    /// Run `operation` on the holder's dispatcher without blocking the caller.
    ///
    /// Failures (errors or panics) are handed to the holder's
    /// [`FailureHandler`] and reported by [`GuardedTask::join`]. The operation
    /// is aborted when the owning scope closes.
    pub fn run_guarded<F>(&self, operation: F) -> GuardedTask
    where
        F: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let id = self.shared.next_task_id.fetch_add(1, Ordering::Relaxed);
        guard::spawn(id, self.clone(), operation)
    }

    pub(crate) fn dispatcher(&self) -> &Dispatcher {
        &self.shared.dispatcher
    }

    pub(crate) fn report_failure(&self, failure: &OperationFailure) {
        self.shared.failure_handler.on_failure(failure, self);
    }
}

impl<S: State> Shared<S> {
    fn commit(&self, slot: &mut Slot<S>, next: S) -> Commit {
        if next == slot.value {
            return Commit::Unchanged {
                version: slot.version,
            };
        }

        slot.version += 1;
        slot.value = next;

        let Slot {
            value,
            version,
            observers,
        } = slot;
        observers.retain(|sender| sender.send(value.clone()).is_ok());

        if self.trace_commits {
            tracing::debug!(
                version = *version,
                observers = observers.len(),
                state = ?value,
                "state committed"
            );
        } else {
            tracing::trace!(version = *version, observers = observers.len(), "state committed");
        }

        Commit::Applied { version: *version }
    }
}

/// Builder for [`StateHolder`].
pub struct StateHolderBuilder<S: State, I> {
    scope: ScopeHandle,
    init: I,
    dispatcher: Option<Dispatcher>,
    failure_handler: Arc<dyn FailureHandler<S>>,
    trace_commits: bool,
}

impl<S, I> StateHolderBuilder<S, I>
where
    S: State,
    I: FnOnce() -> S,
{
    /// Run guarded operations on `dispatcher` instead of the current runtime.
    pub fn dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// Hook invoked for every failed guarded operation.
    pub fn on_failure<F>(self, hook: F) -> Self
    where
        F: Fn(&OperationFailure, &StateHolder<S>) + Send + Sync + 'static,
    {
        self.failure_handler(hook)
    }

    pub fn failure_handler<H>(mut self, handler: H) -> Self
    where
        H: FailureHandler<S>,
    {
        self.failure_handler = Arc::new(handler);
        self
    }

    /// Log every commit together with the committed state at debug level.
    pub fn trace_commits(mut self, enabled: bool) -> Self {
        self.trace_commits = enabled;
        self
    }

    pub fn with_config(self, config: &StoreConfig) -> Self {
        self.trace_commits(config.trace_commits)
    }

    /// # Errors
    /// Returns [`StoreError::NoRuntime`] when no dispatcher was set and the
    /// caller is not inside a tokio runtime.
    pub fn build(self) -> Result<StateHolder<S>> {
        let dispatcher = match self.dispatcher {
            Some(dispatcher) => dispatcher,
            None => Dispatcher::current()?,
        };
        let value = (self.init)();

        Ok(StateHolder {
            shared: Arc::new(Shared {
                slot: Mutex::new(Slot {
                    value,
                    version: 0,
                    observers: Vec::new(),
                }),
                scope: self.scope,
                dispatcher,
                failure_handler: self.failure_handler,
                trace_commits: self.trace_commits,
                next_task_id: AtomicU64::new(1),
            }),
        })
    }
}
