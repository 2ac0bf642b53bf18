//! Base trait for state held by a [`StateHolder`](crate::StateHolder).

use std::fmt::Debug;

/// Marker trait for state snapshots.
///
/// States should be:
/// - Immutable (Clone to create new states)
/// - Comparable (PartialEq; an update producing an equal value is not a commit)
/// - Printable (Debug, used when commit tracing is enabled)
pub trait State: Clone + PartialEq + Debug + Send + 'static {}
