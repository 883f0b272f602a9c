//! Authentication for the News Portal client
//!
//! This crate covers the session lifecycle: form validation, the login,
//! registration and logout flows that write the session store, and the gate
//! every view runs on entry.

pub mod error;
pub mod gate;
pub mod models;
pub mod session;
pub mod validation;

pub use error::{AuthError, AuthResult};
pub use gate::{Access, GateDecision, View, guard, guard_protected, guard_public_only};
pub use models::{LoginForm, RegistrationForm};
pub use session::SessionManager;
pub use validation::ValidationError;
