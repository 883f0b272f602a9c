//! Registration view

use auth::{AuthResult, GateDecision, RegistrationForm, View, guard_public_only};

use super::Entry;
use crate::state::PortalState;

pub struct RegisterView {
    state: PortalState,
    error: Option<String>,
}

impl RegisterView {
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

    /// Submit the form; a new account is signed in straight away
    pub async fn submit(&mut self, form: &RegistrationForm) -> AuthResult<View> {
        self.error = None;
        match self.state.sessions.register(form).await {
            Ok(()) => Ok(View::News),
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
