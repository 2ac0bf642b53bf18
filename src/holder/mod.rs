//! The state container and its observer streams.

mod state_holder;
mod stream;

pub use state_holder::{Commit, StateHolder, StateHolderBuilder};
pub use stream::StateStream;
