//! Entry surface of the News Portal client
//!
//! Routes, views and the state they share. The `news-portal` binary drives
//! these from the command line.

pub mod routes;
pub mod state;
pub mod views;

pub use routes::{Navigation, RouteError, navigate, resolve};
pub use state::PortalState;
