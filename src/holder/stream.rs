//! Observer streams returned by `StateHolder::observe`.

use std::future::{poll_fn, Future};
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::scope::ScopeHandle;

type ClosedFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Ordered sequence of committed states for one observer.
///
/// Yields the state current at subscription, then every later commit in
/// commit order. Ends when the owning scope closes. Dropping the stream
/// unsubscribes it.
pub struct StateStream<S> {
    receiver: UnboundedReceiver<S>,
    closed: ClosedFuture,
    done: bool,
}

impl<S: Send + 'static> StateStream<S> {
    pub(crate) fn new(receiver: UnboundedReceiver<S>, scope: ScopeHandle) -> Self {
        Self {
            receiver,
            closed: Box::pin(async move { scope.closed().await }),
            done: false,
        }
    }

    /// Wait for the next committed state.
    ///
    /// Returns `None` once the owning scope has closed.
    pub async fn next(&mut self) -> Option<S> {
        poll_fn(|cx| Pin::new(&mut *self).poll_next(cx)).await
    }
}

impl<S: Send + 'static> Stream for StateStream<S> {
    type Item = S;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<S>> {
        if self.done {
            return Poll::Ready(None);
        }

        if self.closed.as_mut().poll(cx).is_ready() {
            self.done = true;
            self.receiver.close();
            return Poll::Ready(None);
        }

        match self.receiver.poll_recv(cx) {
            Poll::Ready(Some(state)) => Poll::Ready(Some(state)),
            Poll::Ready(None) => {
                self.done = true;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
