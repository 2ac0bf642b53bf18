//! Pure state transitions for a [`Store`](super::Store).

use super::event::Event;
use super::state::State;

/// Maps the current state and one event to the next state.
///
/// [`Store::dispatch`](super::Store::dispatch) runs `reduce` under the
/// holder's commit lock, so it always sees the result of the previous commit.
/// Keep it free of I/O and of calls back into the store; asynchronous work
/// belongs in [`Store::run_guarded`](super::Store::run_guarded), which
/// dispatches the result as a further event.
pub trait Reducer {
    type State: State;
    type Event: Event;

    /// Next state after `event`. Returning a value equal to `state` leaves
    /// the version untouched and wakes no observer.
    fn reduce(state: Self::State, event: Self::Event) -> Self::State;
}
