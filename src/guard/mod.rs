//! Failure-guarded asynchronous operations.
//!
//! Every operation started through `StateHolder::run_guarded` runs as its own
//! tokio task, watched by a supervising task that:
//!
//! - aborts the operation when the owning scope closes
//! - turns returned errors and panics into an [`OperationFailure`]
//! - hands the failure to the holder's [`FailureHandler`] exactly once
//! - reports the [`GuardedOutcome`] to whoever joins the [`GuardedTask`]

mod failure;
mod task;

pub use failure::{failure_channel, FailureHandler, IgnoreFailures, OperationFailure};
pub use task::{GuardedOutcome, GuardedTask};

pub(crate) use task::spawn;
