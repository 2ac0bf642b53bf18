use stateholder::{Event, Reducer, State};

use super::user::User;

/// State of the profile screen.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileState {
    pub requested: Option<String>,
    pub loading: bool,
    pub user: Option<User>,
    pub error: Option<String>,
}

impl State for ProfileState {}

impl ProfileState {
    /// Loading has finished, one way or the other.
    pub fn is_settled(&self) -> bool {
        !self.loading && (self.user.is_some() || self.error.is_some())
    }

    /// One-line rendering for the terminal.
    pub fn describe(&self) -> String {
        if let Some(error) = &self.error {
            return format!("error: {error}");
        }
        if let Some(user) = &self.user {
            let avatar = user.profile_image_url.as_deref().unwrap_or("no avatar");
            return format!(
                "user {}: {} <{}> ({avatar}, member since {})",
                user.id, user.name, user.email, user.created_at
            );
        }
        match (&self.requested, self.loading) {
            (Some(id), true) => format!("loading user {id}..."),
            _ => "idle".to_string(),
        }
    }
}

#[derive(Debug)]
pub enum ProfileEvent {
    Load { user_id: String },
    Loaded(User),
    LoadFailed(String),
}

impl Event for ProfileEvent {}

pub struct ProfileReducer;

impl Reducer for ProfileReducer {
    type State = ProfileState;
    type Event = ProfileEvent;

    fn reduce(state: ProfileState, event: ProfileEvent) -> ProfileState {
        match event {
            ProfileEvent::Load { user_id } => ProfileState {
                requested: Some(user_id),
                loading: true,
                user: None,
                error: None,
            },
            ProfileEvent::Loaded(user) => ProfileState {
                loading: false,
                user: Some(user),
                error: None,
                ..state
            },
            // A failure keeps whatever user was shown before.
            ProfileEvent::LoadFailed(message) => ProfileState {
                loading: false,
                error: Some(message),
                ..state
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> User {
        User {
            id: "1".to_string(),
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            profile_image_url: None,
            created_at: 0,
        }
    }

    #[test]
    fn load_starts_loading_and_clears_error() {
        let previous = ProfileState {
            error: Some("old".to_string()),
            ..ProfileState::default()
        };
        let state = ProfileReducer::reduce(
            previous,
            ProfileEvent::Load {
                user_id: "1".to_string(),
            },
        );
        assert!(state.loading);
        assert!(state.error.is_none());
        assert_eq!(state.describe(), "loading user 1...");
        assert!(!state.is_settled());
    }

    #[test]
    fn loaded_settles_with_user() {
        let loading = ProfileReducer::reduce(
            ProfileState::default(),
            ProfileEvent::Load {
                user_id: "1".to_string(),
            },
        );
        let state = ProfileReducer::reduce(loading, ProfileEvent::Loaded(ada()));
        assert!(state.is_settled());
        assert_eq!(state.requested.as_deref(), Some("1"));
        assert_eq!(
            state.describe(),
            "user 1: Ada Lovelace <ada@example.com> (no avatar, member since 0)"
        );
    }

    #[test]
    fn failure_keeps_previous_user() {
        let shown = ProfileState {
            user: Some(ada()),
            ..ProfileState::default()
        };
        let state = ProfileReducer::reduce(shown, ProfileEvent::LoadFailed("offline".into()));
        assert!(state.is_settled());
        assert!(state.user.is_some());
        assert_eq!(state.describe(), "error: offline");
    }

    #[test]
    fn default_state_is_idle() {
        assert_eq!(ProfileState::default().describe(), "idle");
    }
}
