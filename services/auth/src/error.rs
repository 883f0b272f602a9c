//! Custom error types for the authentication flows
//!
//! Display strings are the messages shown to the user. Rejected logins and
//! registrations get one generic message whatever the backend said.

use common::error::SessionError;
use thiserror::Error;

use crate::validation::ValidationError;

/// Custom error type for login, registration and logout
#[derive(Error, Debug)]
pub enum AuthError {
    /// Form was incomplete; nothing was sent
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Login rejected or backend unreachable
    #[error("Login failed. Please check your credentials and try again.")]
    LoginFailed,

    /// Login succeeded without returning a token
    #[error("Invalid response from server.")]
    InvalidResponse,

    /// Registration rejected, or succeeded without returning a token
    #[error("Registration failed. Please try again.")]
    RegistrationFailed,

    /// Credential could not be stored or removed
    #[error("Session storage failed: {0}")]
    Session(#[from] SessionError),
}

/// Type alias for authentication results
pub type AuthResult<T> = Result<T, AuthError>;
