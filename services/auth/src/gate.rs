//! Session gate for view entry
//!
//! Every view checks the session store itself when it is entered. There is
//! no shared cache of the result, so a credential cleared between two view
//! entries redirects the second one.

use std::fmt;
use tracing::info;

use common::session::{SessionStore, current_token};

/// Navigable views of the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Login,
    Register,
    News,
    Preferences,
}

/// Who may enter a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Only visitors without a session (login, register)
    PublicOnly,
    /// Only visitors with a session
    Protected,
}

impl View {
    pub const ALL: [View; 4] = [View::Login, View::Register, View::News, View::Preferences];

    pub fn path(self) -> &'static str {
        match self {
            View::Login => "/login",
            View::Register => "/register",
            View::News => "/news",
            View::Preferences => "/preferences",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|view| view.path() == path)
    }

    pub fn access(self) -> Access {
        match self {
            View::Login | View::Register => Access::PublicOnly,
            View::News | View::Preferences => Access::Protected,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of a gate check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Redirect(View),
}

/// Guard for views that need a session; redirects to login otherwise
pub fn guard_protected(store: &dyn SessionStore) -> GateDecision {
    if current_token(store).is_some() {
        GateDecision::Allow
    } else {
        info!("No session, redirecting to {}", View::Login);
        GateDecision::Redirect(View::Login)
    }
}

/// Guard for entry views; signed-in users are sent to the news view
pub fn guard_public_only(store: &dyn SessionStore) -> GateDecision {
    if current_token(store).is_some() {
        info!("Already signed in, redirecting to {}", View::News);
        GateDecision::Redirect(View::News)
    } else {
        GateDecision::Allow
    }
}

/// Apply the guard matching `view`'s access rule
pub fn guard(view: View, store: &dyn SessionStore) -> GateDecision {
    match view.access() {
        Access::PublicOnly => guard_public_only(store),
        Access::Protected => guard_protected(store),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::session::MemorySessionStore;

    #[test]
    fn test_protected_views_redirect_without_session() {
        let store = MemorySessionStore::new();
        assert_eq!(guard(View::News, &store), GateDecision::Redirect(View::Login));
        assert_eq!(
            guard(View::Preferences, &store),
            GateDecision::Redirect(View::Login)
        );
        assert_eq!(guard(View::Login, &store), GateDecision::Allow);
        assert_eq!(guard(View::Register, &store), GateDecision::Allow);
    }

    #[test]
    fn test_entry_views_redirect_with_session() {
        let store = MemorySessionStore::with_token("tok");
        assert_eq!(guard(View::Login, &store), GateDecision::Redirect(View::News));
        assert_eq!(guard(View::Register, &store), GateDecision::Redirect(View::News));
        assert_eq!(guard(View::News, &store), GateDecision::Allow);
        assert_eq!(guard(View::Preferences, &store), GateDecision::Allow);
    }

    #[test]
    fn test_gate_reads_store_on_every_check() {
        let store = MemorySessionStore::with_token("tok");
        assert_eq!(guard_protected(&store), GateDecision::Allow);

        store.clear().unwrap();
        assert_eq!(guard_protected(&store), GateDecision::Redirect(View::Login));

        store.set("again", 60).unwrap();
        assert_eq!(guard_protected(&store), GateDecision::Allow);
    }

    #[test]
    fn test_view_paths() {
        for view in View::ALL {
            assert_eq!(View::from_path(view.path()), Some(view));
        }
        assert_eq!(View::from_path("/"), None);
        assert_eq!(View::from_path("/admin"), None);
    }
}
