//! Request and response bodies exchanged with the workout service.
//!
//! All instants travel as ISO-8601 strings through chrono's serde support.

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{User, Workout};

/// Body for `/signup` and credential-based `/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsRequest {
    pub name: String,
    pub password: String,
}

/// Body for resuming a session with a stored token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRequest {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpResponse {
    pub id: i64,
    pub token: String,
}

/// User record as returned by `/login`, token included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub name: String,
    pub token: String,
}

impl AuthenticatedUser {
    pub fn user(&self) -> User {
        User {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: AuthenticatedUser,
    /// The service encodes an empty list as `null`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub workouts: Vec<Workout>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutCreated {
    pub id: i64,
}

/// Success value for calls answered with 204.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoContent {}

/// Error payload sent with any status >= 400.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Workout>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Workout>>::deserialize(deserializer)?.unwrap_or_default())
}
