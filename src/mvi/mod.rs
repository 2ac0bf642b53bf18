//! Model-View-Intent primitives layered on [`StateHolder`](crate::StateHolder).
//!
//! ```text
//! Event ──→ Reducer ──→ State ──→ observers
//!   ↑                                │
//!   └────────────────────────────────┘
//! ```
//!
//! - **State**: immutable snapshot owned by a holder
//! - **Event**: user intents or system results
//! - **Reducer**: pure function producing the next state

mod event;
mod reducer;
mod state;
mod store;

pub use event::Event;
pub use reducer::Reducer;
pub use state::State;
pub use store::Store;
