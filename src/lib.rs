//! # State Holder
//!
//! A single-writer, multi-reader state container for presentation logic,
//! with failure-guarded asynchronous operations bound to an owning scope.
//!
//! ## Core Concepts
//!
//! - **StateHolder**: one current value, changed only through reducers
//! - **Observers**: ordered, gap-free streams of committed states
//! - **Guarded operations**: async work whose failures go to a hook, never up
//! - **Scope**: the owning context; closing it stops commits and operations
//!
//! ## Example
//!
//! ```ignore
//! use stateholder::{Scope, StateHolder};
//!
//! let scope = Scope::new();
//! let holder = StateHolder::builder(scope.handle(), || Profile::default())
//!     .on_failure(|failure, holder| {
//!         let _ = holder.update(|s| s.with_error(failure.to_string()));
//!     })
//!     .build()?;
//!
//! let mut states = holder.observe();
//! let worker = holder.clone();
//! holder.run_guarded(async move {
//!     let user = api.fetch_user("42").await?;
//!     worker.update(|s| s.with_user(user))?;
//!     Ok(())
//! });
//!
//! while let Some(state) = states.next().await {
//!     render(&state);
//! }
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod guard;
pub mod holder;
pub mod logging;
pub mod mvi;
pub mod scope;

// Re-exports
pub use config::{Config, ConfigError, LoggingConfig, RuntimeConfig, StoreConfig};
pub use dispatch::Dispatcher;
pub use error::{Result, StoreError};
pub use guard::{
    failure_channel, FailureHandler, GuardedOutcome, GuardedTask, IgnoreFailures,
    OperationFailure,
};
pub use holder::{Commit, StateHolder, StateHolderBuilder, StateStream};
pub use mvi::{Event, Reducer, State, Store};
pub use scope::{Scope, ScopeHandle};
