use serde::{Deserialize, Serialize};

/// An account on the workout service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
}

/// The authenticated user for the current run, plus the bearer token.
///
/// Dropped on logout; only the token outlives the process, through a
/// [`CredentialStore`](crate::credentials::CredentialStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: User,
    pub token: String,
}

impl Session {
    pub fn new(user: User, token: impl Into<String>) -> Self {
        Self {
            user,
            token: token.into(),
        }
    }

    pub fn user_id(&self) -> i64 {
        self.user.id
    }
}
