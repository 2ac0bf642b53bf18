use std::future::Future;

use tokio::task::{AbortHandle, JoinError, JoinHandle};

use crate::holder::StateHolder;
use crate::mvi::State;
use crate::scope::ScopeHandle;

use super::failure::OperationFailure;

/// How a guarded operation ended.
#[derive(Debug, Clone)]
pub enum GuardedOutcome {
    Completed,
    Failed(OperationFailure),
    /// Aborted by scope closure or [`GuardedTask::abort`].
    Cancelled,
}

impl GuardedOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, GuardedOutcome::Completed)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, GuardedOutcome::Cancelled)
    }

    pub fn failure(&self) -> Option<&OperationFailure> {
        match self {
            GuardedOutcome::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Handle to an operation started with `StateHolder::run_guarded`.
///
/// Dropping the handle detaches it; the operation keeps running until it
/// finishes or its scope closes.
pub struct GuardedTask {
    id: u64,
    operation: AbortHandle,
    supervisor: JoinHandle<GuardedOutcome>,
}

impl GuardedTask {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_finished(&self) -> bool {
        self.supervisor.is_finished()
    }

    /// Cancel the operation at its next suspension point.
    pub fn abort(&self) {
        self.operation.abort();
    }

    /// Wait for the operation and report how it ended.
    pub async fn join(self) -> GuardedOutcome {
        match self.supervisor.await {
            Ok(outcome) => outcome,
            Err(error) if error.is_panic() => {
                GuardedOutcome::Failed(OperationFailure::from_panic(error.into_panic()))
            }
            Err(_) => GuardedOutcome::Cancelled,
        }
    }
}

pub(crate) fn spawn<S, F>(id: u64, holder: StateHolder<S>, operation: F) -> GuardedTask
where
    S: State,
    F: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    let ticket = holder.scope().track_operation();
    let dispatcher = holder.dispatcher().clone();
    let scope = holder.scope().clone();

    let operation = dispatcher.spawn(operation);
    let abort = operation.abort_handle();
    let supervisor = dispatcher.spawn(async move {
        let outcome = supervise(id, &scope, &holder, operation).await;
        drop(ticket);
        outcome
    });

    tracing::trace!(task = id, "guarded operation started");

    GuardedTask {
        id,
        operation: abort,
        supervisor,
    }
}

async fn supervise<S: State>(
    id: u64,
    scope: &ScopeHandle,
    holder: &StateHolder<S>,
    mut operation: JoinHandle<anyhow::Result<()>>,
) -> GuardedOutcome {
    let joined = tokio::select! {
        biased;
        _ = scope.closed() => None,
        joined = &mut operation => Some(joined),
    };

    let joined = match joined {
        Some(joined) => joined,
        None => {
            // The abort lands at the next suspension point. Until the task
            // has stopped it still counts as in flight.
            operation.abort();
            return settle_after_close(id, operation.await);
        }
    };

    let failure = match classify(joined) {
        Ok(()) => {
            tracing::trace!(task = id, "guarded operation completed");
            return GuardedOutcome::Completed;
        }
        Err(None) => {
            tracing::debug!(task = id, "guarded operation aborted");
            return GuardedOutcome::Cancelled;
        }
        Err(Some(failure)) => failure,
    };

    if scope.is_closed() {
        tracing::debug!(task = id, error = %failure, "guarded operation failed after scope closed");
    } else {
        tracing::warn!(task = id, error = %failure, "guarded operation failed");
        holder.report_failure(&failure);
    }

    GuardedOutcome::Failed(failure)
}

/// Outcome of an operation whose scope closed while it was being supervised.
///
/// One that already returned `Ok` keeps its `Completed` outcome; its commits
/// landed. Anything else is `Cancelled` and never reaches the hook.
fn settle_after_close(
    id: u64,
    joined: Result<anyhow::Result<()>, JoinError>,
) -> GuardedOutcome {
    match classify(joined) {
        Ok(()) => {
            tracing::trace!(task = id, "guarded operation completed before scope closed");
            GuardedOutcome::Completed
        }
        Err(Some(failure)) => {
            tracing::debug!(task = id, error = %failure, "guarded operation stopped after scope closed");
            GuardedOutcome::Cancelled
        }
        Err(None) => {
            tracing::debug!(task = id, "guarded operation cancelled by scope");
            GuardedOutcome::Cancelled
        }
    }
}

/// `Err(None)` means the operation was aborted.
fn classify(
    joined: Result<anyhow::Result<()>, JoinError>,
) -> Result<(), Option<OperationFailure>> {
    match joined {
        Ok(Ok(())) => Ok(()),
        Ok(Err(error)) => Err(Some(OperationFailure::from(error))),
        Err(error) if error.is_panic() => {
            Err(Some(OperationFailure::from_panic(error.into_panic())))
        }
        Err(_) => Err(None),
    }
}
