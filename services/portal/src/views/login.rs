//! Login view

use auth::{AuthResult, GateDecision, LoginForm, View, guard_public_only};

use super::Entry;
use crate::state::PortalState;

pub struct LoginView {
    state: PortalState,
    error: Option<String>,
}

impl LoginView {
    /// Enter the view; signed-in visitors are redirected to news
    pub fn enter(state: &PortalState) -> Entry<Self> {
        match guard_public_only(state.store.as_ref()) {
            GateDecision::Allow => Entry::Entered(Self {
                state: state.clone(),
                error: None,
            }),
            GateDecision::Redirect(view) => Entry::Redirected(view),
        }
    }

    /// Submit the form; on success the next view is news
    pub async fn submit(&mut self, form: &LoginForm) -> AuthResult<View> {
        self.error = None;
        match self.state.sessions.login(form).await {
            Ok(()) => Ok(View::News),
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Message from the last failed submission
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
