//! HTTP client for the workout service.
//!
//! Every call is a single attempt: the body is encoded up front, sent with
//! the verb for the operation, and the response is classified into a typed
//! success or an [`ApiError`].

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::ApiError;
use super::protocol::{
    CredentialsRequest, ErrorBody, LoginResponse, NoContent, SignUpResponse, TokenRequest,
    WorkoutCreated,
};
use crate::models::Workout;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The operations the service understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpVerb {
    Create,
    Replace,
    Delete,
}

impl HttpVerb {
    pub fn method(&self) -> Method {
        match self {
            HttpVerb::Create => Method::POST,
            HttpVerb::Replace => Method::PUT,
            HttpVerb::Delete => Method::DELETE,
        }
    }
}

/// Client for the workout service.
///
/// Built once from configuration and passed to whatever needs it.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl ApiClient {
    /// Creates a client for `base_url` with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            http,
        })
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the bearer token sent with requests, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Full URL for a resource path.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Executes one request and decodes the response as `R`.
    ///
    /// `empty_fallback` is returned when the server answers 204. Without it
    /// a 204 is decoded like any other body and fails.
    pub async fn execute<B, R>(
        &self,
        verb: HttpVerb,
        path: &str,
        body: &B,
        empty_fallback: Option<R>,
    ) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body).map_err(ApiError::Serialization)?;
        let url = self.url(path);
        let method = verb.method();

        tracing::debug!(%method, %url, bytes = payload.len(), "Sending request");

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(%method, %url, error = %e, "Request failed");
                return Err(ApiError::Transport(e));
            }
        };

        let status = response.status().as_u16();
        let bytes = response.bytes().await?;

        let outcome = classify_response(status, &bytes, empty_fallback);
        match &outcome {
            Ok(_) => tracing::debug!(%method, %url, status, "Request succeeded"),
            Err(e) => {
                tracing::warn!(%method, %url, status, error = %e, "Request returned an error")
            }
        }
        outcome
    }

    /// Registers a new account.
    pub async fn sign_up(&self, name: &str, password: &str) -> Result<SignUpResponse, ApiError> {
        let request = CredentialsRequest {
            name: name.to_string(),
            password: password.to_string(),
        };
        self.execute(HttpVerb::Create, "/signup", &request, None).await
    }

    /// Logs in with a name and password, returning the user and workouts.
    pub async fn log_in(&self, name: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let request = CredentialsRequest {
            name: name.to_string(),
            password: password.to_string(),
        };
        self.execute(HttpVerb::Create, "/login", &request, None).await
    }

    /// Logs in with a previously issued token.
    pub async fn resume(&self, token: &str) -> Result<LoginResponse, ApiError> {
        let request = TokenRequest {
            token: token.to_string(),
        };
        self.execute(HttpVerb::Create, "/login", &request, None).await
    }

    /// Stores a new workout and returns the id the server assigned.
    pub async fn create_workout(&self, workout: &Workout) -> Result<WorkoutCreated, ApiError> {
        self.execute(HttpVerb::Create, "/workout", workout, None).await
    }

    pub async fn update_workout(&self, workout: &Workout) -> Result<(), ApiError> {
        let _: NoContent = self
            .execute(
                HttpVerb::Replace,
                "/workout",
                workout,
                Some(NoContent::default()),
            )
            .await?;
        Ok(())
    }

    pub async fn delete_workout(&self, workout: &Workout) -> Result<(), ApiError> {
        let path = format!("/workout/{}", workout.id);
        let _: NoContent = self
            .execute(HttpVerb::Delete, &path, workout, Some(NoContent::default()))
            .await?;
        Ok(())
    }
}

/// Turns a status code and raw body into a typed outcome.
///
/// - 204 with a fallback yields the fallback.
/// - Status >= 400 is parsed as `{"error": "..."}`.
/// - Any other success with an empty body yields [`ApiError::NoData`],
///   except 204, which is decoded (and fails) like a normal body.
pub fn classify_response<R>(
    status: u16,
    body: &[u8],
    empty_fallback: Option<R>,
) -> Result<R, ApiError>
where
    R: DeserializeOwned,
{
    if status == 204 {
        if let Some(fallback) = empty_fallback {
            return Ok(fallback);
        }
    }

    if status >= 400 {
        let error: ErrorBody =
            serde_json::from_slice(body).map_err(ApiError::Deserialization)?;
        return Err(ApiError::Api {
            code: status,
            message: error.error,
        });
    }

    if body.is_empty() && status != 204 {
        return Err(ApiError::NoData);
    }

    serde_json::from_slice(body).map_err(ApiError::Deserialization)
}
