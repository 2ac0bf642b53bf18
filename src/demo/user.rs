use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use anyhow::{anyhow, bail};

/// Domain model of an application user.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub profile_image_url: Option<String>,
    /// Unix timestamp in seconds.
    pub created_at: u64,
}

/// Asynchronous, fallible source of users (the remote API in a real app).
pub trait UserSource: Send + Sync {
    fn fetch_user(&self, id: &str) -> impl Future<Output = anyhow::Result<User>> + Send;
}

/// In-memory user source with simulated latency.
pub struct InMemoryUsers {
    users: HashMap<String, User>,
    latency: Duration,
    unavailable: bool,
}

impl InMemoryUsers {
    pub fn seeded(latency: Duration) -> Self {
        let users = [
            User {
                id: "1".to_string(),
                name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                profile_image_url: Some("https://example.com/avatars/1.png".to_string()),
                created_at: 1_640_995_200,
            },
            User {
                id: "2".to_string(),
                name: "Alan Turing".to_string(),
                email: "alan@example.com".to_string(),
                profile_image_url: None,
                created_at: 1_643_673_600,
            },
        ];

        Self {
            users: users.into_iter().map(|u| (u.id.clone(), u)).collect(),
            latency,
            unavailable: false,
        }
    }

    /// Make every fetch fail as if the service were down.
    pub fn unavailable(mut self, unavailable: bool) -> Self {
        self.unavailable = unavailable;
        self
    }
}

impl UserSource for InMemoryUsers {
    async fn fetch_user(&self, id: &str) -> anyhow::Result<User> {
        tokio::time::sleep(self.latency).await;
        if self.unavailable {
            bail!("user service unavailable");
        }
        self.users
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow!("user '{id}' not found"))
    }
}
