//! Views of the client
//!
//! Each view runs its gate when entered and keeps the messages it shows.
//! Failures never escape a view: they become a banner or an inline error
//! and the view stays usable.

use tracing::info;

use auth::{AuthResult, View};

use crate::state::PortalState;

pub mod login;
pub mod news;
pub mod preferences;
pub mod register;

pub use login::LoginView;
pub use news::NewsView;
pub use preferences::PreferencesView;
pub use register::RegisterView;

pub const NEWS_FETCH_FAILED: &str = "Failed to fetch news. Please try again later.";
pub const NO_MATCHING_NEWS: &str = "No news items match your criteria.";
pub const PREFERENCES_LOAD_FAILED: &str = "Failed to load available options or your preferences.";
pub const PREFERENCES_SAVE_FAILED: &str = "Failed to save your preferences.";

/// Outcome of entering a view
#[derive(Debug)]
pub enum Entry<T> {
    /// The gate admitted entry
    Entered(T),
    /// The gate sent the visitor elsewhere
    Redirected(View),
}

impl<T> Entry<T> {
    pub fn entered(self) -> Option<T> {
        match self {
            Entry::Entered(view) => Some(view),
            Entry::Redirected(_) => None,
        }
    }

    pub fn redirect(&self) -> Option<View> {
        match self {
            Entry::Entered(_) => None,
            Entry::Redirected(view) => Some(*view),
        }
    }
}

/// Drop the session and return the view to show next
pub fn logout(state: &PortalState) -> AuthResult<View> {
    state.sessions.logout()?;
    info!("Logged out");
    Ok(View::Login)
}
