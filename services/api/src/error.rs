//! Custom error types for the remote gateway

use std::fmt::Display;
use thiserror::Error;

/// Custom error type for backend requests
///
/// Transport errors, non-2xx statuses and undecodable bodies all collapse
/// into the one condition; callers only learn which operation failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The request could not be completed
    #[error("Request failed ({operation}): {detail}")]
    RequestFailed {
        operation: &'static str,
        detail: String,
    },
}

impl GatewayError {
    pub fn request_failed(operation: &'static str, detail: impl Display) -> Self {
        GatewayError::RequestFailed {
            operation,
            detail: detail.to_string(),
        }
    }

    /// Name of the gateway operation that failed
    pub fn operation(&self) -> &'static str {
        match self {
            GatewayError::RequestFailed { operation, .. } => operation,
        }
    }
}

/// Type alias for gateway results
pub type GatewayResult<T> = Result<T, GatewayError>;
