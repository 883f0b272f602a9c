//! API models for request and response payloads

use serde::{Deserialize, Serialize};

pub mod news;
pub mod preferences;

/// Request for user login
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request for user registration
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Response for login and registration
///
/// A 2xx response may still omit the token; callers treat that as a
/// rejected attempt.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenResponse {
    pub token: Option<String>,
}
