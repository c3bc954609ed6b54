//! Sign up, log in, resume and log out.
//!
//! A successful login yields the [`Session`] and a [`WorkoutCache`] loaded
//! with the user's workouts. The token is written to the credential store so
//! the next run can resume without a password.

use chrono::TimeZone;

use crate::api::{ApiClient, ApiError, LoginResponse};
use crate::cache::WorkoutCache;
use crate::credentials::{CredentialError, CredentialStore};
use crate::models::{Session, User};

/// Errors that can occur while establishing or ending a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("No stored session token")]
    NoToken,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Credential(#[from] CredentialError),
}

/// Owns the API client and the token store for one run.
#[derive(Debug)]
pub struct SessionManager<C: CredentialStore> {
    client: ApiClient,
    store: C,
}

impl<C: CredentialStore> SessionManager<C> {
    pub fn new(client: ApiClient, store: C) -> Self {
        Self { client, store }
    }

    /// Returns the API client, carrying the token once logged in.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn store(&self) -> &C {
        &self.store
    }

    /// Returns true if a token is stored.
    pub fn has_token(&self) -> Result<bool, SessionError> {
        Ok(self.store.get()?.is_some())
    }

    /// Creates an account. The new user starts with no workouts.
    pub async fn sign_up<Tz: TimeZone>(
        &mut self,
        name: &str,
        password: &str,
        tz: Tz,
    ) -> Result<(Session, WorkoutCache<Tz>), SessionError> {
        let response = self.client.sign_up(name, password).await?;
        tracing::info!(user = response.id, "Signed up");

        self.remember(&response.token)?;
        let user = User {
            id: response.id,
            name: name.to_string(),
        };
        Ok((
            Session::new(user, response.token),
            WorkoutCache::with_timezone(tz),
        ))
    }

    /// Logs in with a name and password.
    pub async fn log_in<Tz: TimeZone>(
        &mut self,
        name: &str,
        password: &str,
        tz: Tz,
    ) -> Result<(Session, WorkoutCache<Tz>), SessionError> {
        let response = self.client.log_in(name, password).await?;
        self.establish(response, tz)
    }

    /// Logs in with the stored token.
    pub async fn resume<Tz: TimeZone>(
        &mut self,
        tz: Tz,
    ) -> Result<(Session, WorkoutCache<Tz>), SessionError> {
        let token = self.store.get()?.ok_or(SessionError::NoToken)?;
        let response = self.client.resume(&token).await?;
        self.establish(response, tz)
    }

    /// Forgets the stored token.
    pub fn log_out(&mut self) -> Result<(), SessionError> {
        self.store.clear()?;
        self.client.set_token(None);
        tracing::info!("Logged out");
        Ok(())
    }

    fn establish<Tz: TimeZone>(
        &mut self,
        response: LoginResponse,
        tz: Tz,
    ) -> Result<(Session, WorkoutCache<Tz>), SessionError> {
        let LoginResponse { user, workouts } = response;
        tracing::info!(user = user.id, workouts = workouts.len(), "Logged in");

        self.remember(&user.token)?;
        let mut cache = WorkoutCache::with_timezone(tz);
        cache.load(workouts);
        Ok((Session::new(user.user(), user.token), cache))
    }

    fn remember(&mut self, token: &str) -> Result<(), SessionError> {
        self.store.save(token)?;
        self.client.set_token(Some(token.to_string()));
        Ok(())
    }
}
