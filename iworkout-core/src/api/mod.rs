//! Transport for the workout REST service.
//!
//! ## Protocol
//!
//! JSON over HTTP against a single base URL:
//! 1. `POST /signup` and `POST /login` authenticate and return the token
//! 2. `POST /workout` creates, `PUT /workout` updates
//! 3. `DELETE /workout/{id}` removes
//! 4. Errors come back as `{"error": "..."}` with a status >= 400

mod client;
mod error;
mod protocol;

pub use client::{classify_response, ApiClient, HttpVerb, DEFAULT_TIMEOUT};
pub use error::ApiError;
pub use protocol::{
    AuthenticatedUser, CredentialsRequest, ErrorBody, LoginResponse, NoContent, SignUpResponse,
    TokenRequest, WorkoutCreated,
};
