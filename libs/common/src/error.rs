//! Custom error types for the common library
//!
//! This module defines the error types shared by the client components for
//! session storage and configuration loading.

use thiserror::Error;

/// Custom error type for session store operations
#[derive(Error, Debug)]
pub enum SessionError {
    /// Error reading or writing the session file
    #[error("Session storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored session could not be encoded or decoded
    #[error("Session encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Error talking to the Redis session backend
    #[error("Session cache error: {0}")]
    Redis(#[from] redis::RedisError),

    /// The in-process store lock was poisoned by a panicking writer
    #[error("Session store lock poisoned")]
    Poisoned,
}

/// Type alias for Result with SessionError
pub type SessionResult<T> = Result<T, SessionError>;

/// Custom error type for configuration loading
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error raised while assembling configuration sources
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),

    /// The API base URL is not an absolute http(s) URL
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    /// The session backend name is not recognised
    #[error("Unknown session backend: {0}")]
    UnknownBackend(String),
}

/// Type alias for Result with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
