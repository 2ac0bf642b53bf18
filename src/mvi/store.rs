//! Event dispatch over a [`StateHolder`].

use std::future::Future;
use std::marker::PhantomData;

use crate::error::Result;
use crate::guard::GuardedTask;
use crate::holder::{Commit, StateHolder, StateHolderBuilder, StateStream};
use crate::scope::ScopeHandle;

use super::reducer::Reducer;

/// A [`StateHolder`] driven by the events of reducer `R`.
///
/// `dispatch` is the single entry point for user intents; asynchronous
/// results are fed back the same way from inside guarded operations.
pub struct Store<R: Reducer> {
    holder: StateHolder<R::State>,
    _reducer: PhantomData<fn() -> R>,
}

impl<R: Reducer> Clone for Store<R> {
    fn clone(&self) -> Self {
        Self {
            holder: self.holder.clone(),
            _reducer: PhantomData,
        }
    }
}

impl<R: Reducer> Store<R> {
    /// # Errors
    /// Returns [`StoreError::NoRuntime`](crate::StoreError::NoRuntime) outside
    /// a tokio runtime.
    pub fn new<I>(scope: ScopeHandle, init: I) -> Result<Self>
    where
        I: FnOnce() -> R::State,
    {
        StateHolder::new(scope, init).map(Self::from_holder)
    }

    /// Build the underlying holder with custom settings.
    pub fn build<I>(builder: StateHolderBuilder<R::State, I>) -> Result<Self>
    where
        I: FnOnce() -> R::State,
    {
        builder.build().map(Self::from_holder)
    }

    pub fn from_holder(holder: StateHolder<R::State>) -> Self {
        Self {
            holder,
            _reducer: PhantomData,
        }
    }

    /// Reduce `event` against the current state and commit the result.
    ///
    /// # Errors
    /// Returns [`StoreError::Closed`](crate::StoreError::Closed) once the
    /// owning scope has ended.
    pub fn dispatch(&self, event: R::Event) -> Result<Commit> {
        self.holder.update(|state| R::reduce(state.clone(), event))
    }

    pub fn state(&self) -> R::State {
        self.holder.current()
    }

    pub fn observe(&self) -> StateStream<R::State> {
        self.holder.observe()
    }

    pub fn run_guarded<F>(&self, operation: F) -> GuardedTask
    where
        F: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.holder.run_guarded(operation)
    }

    pub fn holder(&self) -> &StateHolder<R::State> {
        &self.holder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mvi::{Event, State};
    use crate::scope::Scope;

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Cart {
        items: Vec<String>,
    }

    impl State for Cart {}

    enum CartEvent {
        Add(String),
        Clear,
    }

    impl Event for CartEvent {}

    struct CartReducer;

    impl Reducer for CartReducer {
        type State = Cart;
        type Event = CartEvent;

        fn reduce(mut state: Cart, event: CartEvent) -> Cart {
            match event {
                CartEvent::Add(item) => state.items.push(item),
                CartEvent::Clear => state.items.clear(),
            }
            state
        }
    }

    #[tokio::test]
    async fn dispatch_reduces_in_order() {
        let scope = Scope::new();
        let store = Store::<CartReducer>::new(scope.handle(), Cart::default).unwrap();

        store.dispatch(CartEvent::Add("apple".into())).unwrap();
        store.dispatch(CartEvent::Add("pear".into())).unwrap();
        assert_eq!(store.state().items, vec!["apple", "pear"]);

        let commit = store.dispatch(CartEvent::Clear).unwrap();
        assert_eq!(commit.version(), 3);
        assert!(store.state().items.is_empty());
    }

    #[tokio::test]
    async fn clear_on_empty_cart_is_unchanged() {
        let scope = Scope::new();
        let store = Store::<CartReducer>::new(scope.handle(), Cart::default).unwrap();
        assert!(!store.dispatch(CartEvent::Clear).unwrap().is_applied());
    }

    #[tokio::test]
    async fn clones_share_state() {
        let scope = Scope::new();
        let store = Store::<CartReducer>::new(scope.handle(), Cart::default).unwrap();
        let other = store.clone();

        other.dispatch(CartEvent::Add("fig".into())).unwrap();
        assert_eq!(store.state().items, vec!["fig"]);
        assert_eq!(store.holder().version(), 1);
    }
}
