//! Authentication form models

pub mod user;

// Re-export for convenience
pub use user::{LoginForm, RegistrationForm};
