use std::any::Any;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::holder::StateHolder;
use crate::mvi::State;

/// Why a guarded operation did not complete.
#[derive(Debug, Clone, Error)]
pub enum OperationFailure {
    /// The operation returned an error.
    #[error("{0:#}")]
    Failed(Arc<anyhow::Error>),

    /// The operation panicked.
    #[error("operation panicked: {0}")]
    Panicked(String),
}

impl OperationFailure {
    /// The underlying error, when the operation returned one.
    pub fn error(&self) -> Option<&anyhow::Error> {
        match self {
            OperationFailure::Failed(error) => Some(error),
            OperationFailure::Panicked(_) => None,
        }
    }

    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(message) = payload.downcast_ref::<&str>() {
            (*message).to_string()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "non-string panic payload".to_string()
        };
        OperationFailure::Panicked(message)
    }
}

impl From<anyhow::Error> for OperationFailure {
    fn from(error: anyhow::Error) -> Self {
        OperationFailure::Failed(Arc::new(error))
    }
}

/// Receives failures of guarded operations.
///
/// The holder is passed along so handlers can record the failure in state,
/// e.g. by setting an error field.
pub trait FailureHandler<S: State>: Send + Sync + 'static {
    fn on_failure(&self, failure: &OperationFailure, holder: &StateHolder<S>) {
        let _ = (failure, holder);
    }
}

/// Default handler: failures are only recorded in the tracing log.
pub struct IgnoreFailures;

impl<S: State> FailureHandler<S> for IgnoreFailures {}

impl<S, F> FailureHandler<S> for F
where
    S: State,
    F: Fn(&OperationFailure, &StateHolder<S>) + Send + Sync + 'static,
{
    fn on_failure(&self, failure: &OperationFailure, holder: &StateHolder<S>) {
        self(failure, holder)
    }
}

/// Handler that forwards every failure as a channel message.
pub fn failure_channel<S: State>() -> (impl FailureHandler<S>, UnboundedReceiver<OperationFailure>)
{
    let (sender, receiver) = mpsc::unbounded_channel();
    let handler = move |failure: &OperationFailure, _holder: &StateHolder<S>| {
        if sender.send(failure.clone()).is_err() {
            tracing::trace!("failure channel receiver dropped");
        }
    };
    (handler, receiver)
}
