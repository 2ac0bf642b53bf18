//! Shared test state types and helpers.

#![allow(dead_code)]

use std::time::Duration;

use stateholder::{State, StateStream};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Counter {
    pub count: u32,
    pub error: Option<String>,
}

impl State for Counter {}

pub fn counter(count: u32) -> Counter {
    Counter { count, error: None }
}

pub fn increment(state: &Counter) -> Counter {
    Counter {
        count: state.count + 1,
        ..state.clone()
    }
}

/// Receive the next state, failing the test if none arrives within a second.
pub async fn next_state<S: Send + 'static>(stream: &mut StateStream<S>) -> Option<S> {
    tokio::time::timeout(Duration::from_secs(1), stream.next())
        .await
        .expect("timed out waiting for state")
}

/// Assert that no state is pending on the stream.
pub async fn assert_quiet<S: Send + std::fmt::Debug + 'static>(stream: &mut StateStream<S>) {
    let pending = tokio::time::timeout(Duration::from_millis(50), stream.next()).await;
    assert!(pending.is_err(), "unexpected state: {:?}", pending);
}
