//! Route table and navigation
//!
//! Paths resolve to views, `/` resolves to the news view, and entering a
//! view runs its gate. Gate redirects are followed until a view admits
//! entry.

use thiserror::Error;
use tracing::debug;

use auth::{GateDecision, View, guard};
use common::session::SessionStore;

/// View the default route lands on
pub const DEFAULT_VIEW: View = View::News;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("No view at path: {0}")]
    NotFound(String),

    #[error("Redirect loop while entering {0}")]
    RedirectLoop(View),
}

/// Result of navigating to a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// View that admitted entry
    pub view: View,
    /// Views that redirected, in order
    pub redirected_from: Vec<View>,
}

/// Resolve a path to its view
pub fn resolve(path: &str) -> Result<View, RouteError> {
    let trimmed = path.trim();
    if trimmed.is_empty() || trimmed == "/" {
        return Ok(DEFAULT_VIEW);
    }

    let normalized = trimmed.trim_end_matches('/');
    View::from_path(normalized).ok_or_else(|| RouteError::NotFound(path.to_string()))
}

/// Enter `view`, following gate redirects
pub fn enter(view: View, store: &dyn SessionStore) -> Result<Navigation, RouteError> {
    let mut current = view;
    let mut redirected_from = Vec::new();

    // Each view can redirect at most once before the chain must settle
    for _ in 0..=View::ALL.len() {
        match guard(current, store) {
            GateDecision::Allow => {
                return Ok(Navigation {
                    view: current,
                    redirected_from,
                });
            }
            GateDecision::Redirect(target) => {
                debug!("{} redirected to {}", current, target);
                redirected_from.push(current);
                current = target;
            }
        }
    }

    Err(RouteError::RedirectLoop(view))
}

/// Resolve `path` and enter the view it names
pub fn navigate(path: &str, store: &dyn SessionStore) -> Result<Navigation, RouteError> {
    enter(resolve(path)?, store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::session::MemorySessionStore;

    #[test]
    fn test_resolve_paths() {
        assert_eq!(resolve("/"), Ok(View::News));
        assert_eq!(resolve(""), Ok(View::News));
        assert_eq!(resolve("/login"), Ok(View::Login));
        assert_eq!(resolve("/preferences/"), Ok(View::Preferences));
        assert_eq!(
            resolve("/admin"),
            Err(RouteError::NotFound("/admin".to_string()))
        );
    }

    #[test]
    fn test_default_route_without_session_lands_on_login() {
        let store = MemorySessionStore::new();
        let navigation = navigate("/", &store).unwrap();
        assert_eq!(navigation.view, View::Login);
        assert_eq!(navigation.redirected_from, vec![View::News]);
    }

    #[test]
    fn test_entry_views_with_session_land_on_news() {
        let store = MemorySessionStore::with_token("tok");
        for path in ["/login", "/register"] {
            let navigation = navigate(path, &store).unwrap();
            assert_eq!(navigation.view, View::News);
            assert_eq!(navigation.redirected_from.len(), 1);
        }

        let navigation = navigate("/preferences", &store).unwrap();
        assert_eq!(navigation.view, View::Preferences);
        assert!(navigation.redirected_from.is_empty());
    }
}
