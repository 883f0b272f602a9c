//! Common library for the News Portal client
//!
//! This crate provides functionality shared by the client components,
//! including configuration loading, the error taxonomy, and storage for the
//! session credential.
//!
//! ```rust,no_run
//! use common::config::ClientConfig;
//! use common::session::{current_token, open_store};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::from_env()?;
//!     let store = open_store(&config.session_backend)?;
//!     println!("Signed in: {}", current_token(store.as_ref()).is_some());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod session;
