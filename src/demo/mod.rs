//! Profile screen wired through a [`Store`]: a domain model, an async user
//! source standing in for the REST API, and the reducer that turns load
//! results into screen state.

mod profile;
mod user;

use std::time::Duration;

use anyhow::Context;
use stateholder::{Config, Reducer, Scope, StateHolder, Store};

use profile::{ProfileEvent, ProfileReducer, ProfileState};
use user::{InMemoryUsers, UserSource};

/// Simulated network latency of the in-memory user source.
const FETCH_LATENCY: Duration = Duration::from_millis(150);

/// Load one profile, printing every observed state, then end the scope.
pub async fn run(config: &Config, user_id: String, unavailable: bool) -> anyhow::Result<()> {
    let users = InMemoryUsers::seeded(FETCH_LATENCY).unavailable(unavailable);
    let scope = Scope::new();

    let builder = StateHolder::builder(scope.handle(), ProfileState::default)
        .with_config(&config.store)
        .on_failure(|failure, holder| {
            let event = ProfileEvent::LoadFailed(failure.to_string());
            if let Err(error) = holder.update(|state| ProfileReducer::reduce(state.clone(), event)) {
                tracing::debug!(%error, "failure not recorded");
            }
        });
    let store = Store::<ProfileReducer>::build(builder).context("creating profile store")?;

    let mut states = store.observe();

    store.dispatch(ProfileEvent::Load {
        user_id: user_id.clone(),
    })?;
    let worker = store.clone();
    let task = store.run_guarded(async move {
        let user = users
            .fetch_user(&user_id)
            .await
            .with_context(|| format!("loading profile '{user_id}'"))?;
        worker.dispatch(ProfileEvent::Loaded(user))?;
        Ok(())
    });

    while let Some(state) = states.next().await {
        println!("{}", state.describe());
        if state.is_settled() {
            break;
        }
    }

    let id = task.id();
    let outcome = task.join().await;
    tracing::info!(task = id, ?outcome, "profile load finished");

    scope.close();
    if !scope.drain(config.runtime.drain_timeout()).await {
        tracing::warn!("operations still running at exit");
    }
    Ok(())
}
