//! Events fed to a [`Store`](super::Store).

/// A request to change state, handed to [`Store::dispatch`](super::Store::dispatch).
///
/// Events carry no behavior of their own. The store's [`Reducer`](super::Reducer)
/// turns each one into the next state, which is then committed to the holder
/// and published to its observers.
pub trait Event: Send + 'static {}
