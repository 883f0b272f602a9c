//! Session lifecycle: login, registration and logout
//!
//! These are the only flows that write the session store. Each validates
//! its form before touching the network and stores the returned token with
//! the session ttl.

use tracing::{info, warn};

use api::gateway::SharedGateway;
use api::models::{LoginRequest, RegisterRequest, TokenResponse};
use common::session::{DEFAULT_SESSION_TTL_SECS, SharedSessionStore, current_token};

use crate::error::{AuthError, AuthResult};
use crate::models::{LoginForm, RegistrationForm};
use crate::validation::{validate_login, validate_registration};

/// Session manager for creating and destroying the user's session
#[derive(Clone)]
pub struct SessionManager {
    store: SharedSessionStore,
    gateway: SharedGateway,
    ttl_seconds: u64,
}

impl SessionManager {
    /// Create a new session manager using the default 1 day ttl
    pub fn new(store: SharedSessionStore, gateway: SharedGateway) -> Self {
        Self {
            store,
            gateway,
            ttl_seconds: DEFAULT_SESSION_TTL_SECS,
        }
    }

    /// Override the credential lifetime
    pub fn with_ttl(mut self, ttl_seconds: u64) -> Self {
        self.ttl_seconds = ttl_seconds;
        self
    }

    /// Whether a credential is currently stored
    pub fn is_authenticated(&self) -> bool {
        current_token(self.store.as_ref()).is_some()
    }

    /// Log in and store the returned token
    pub async fn login(&self, form: &LoginForm) -> AuthResult<()> {
        validate_login(form)?;
        info!("Login attempt for user: {}", form.email.trim());

        let response = self
            .gateway
            .login(&LoginRequest::from(form))
            .await
            .map_err(|e| {
                warn!("Login rejected: {}", e);
                AuthError::LoginFailed
            })?;

        let token = issued_token(response).ok_or(AuthError::InvalidResponse)?;
        self.store.set(&token, self.ttl_seconds)?;
        info!("Session created");

        Ok(())
    }

    /// Register a new account and store the returned token
    pub async fn register(&self, form: &RegistrationForm) -> AuthResult<()> {
        validate_registration(form)?;
        info!("Registration attempt for user: {}", form.email.trim());

        let response = self
            .gateway
            .register(&RegisterRequest::from(form))
            .await
            .map_err(|e| {
                warn!("Registration rejected: {}", e);
                AuthError::RegistrationFailed
            })?;

        let token = issued_token(response).ok_or(AuthError::RegistrationFailed)?;
        self.store.set(&token, self.ttl_seconds)?;
        info!("Session created");

        Ok(())
    }

    /// Remove the stored credential
    pub fn logout(&self) -> AuthResult<()> {
        info!("Deleting session");
        self.store.clear()?;
        Ok(())
    }
}

fn issued_token(response: TokenResponse) -> Option<String> {
    response.token.filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::testing::{StubGateway, stub_failure};
    use common::session::{MemorySessionStore, SessionStore};
    use std::sync::Arc;

    use crate::validation::ValidationError;

    fn setup(stub: Arc<StubGateway>) -> (SessionManager, Arc<MemorySessionStore>) {
        let store = Arc::new(MemorySessionStore::new());
        (SessionManager::new(store.clone(), stub), store)
    }

    #[tokio::test]
    async fn test_login_stores_token() {
        let stub = Arc::new(StubGateway::new().with_login(Ok(TokenResponse {
            token: Some("tok-1".to_string()),
        })));
        let (manager, store) = setup(stub.clone());

        manager
            .login(&LoginForm::new("a@b.c", "secret"))
            .await
            .unwrap();

        assert_eq!(current_token(store.as_ref()).as_deref(), Some("tok-1"));
        assert!(manager.is_authenticated());
        assert_eq!(stub.calls(), ["login"]);
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_gateway() {
        let stub = Arc::new(StubGateway::new());
        let (manager, store) = setup(stub.clone());

        let err = manager.login(&LoginForm::new("", "secret")).await.unwrap_err();
        assert!(matches!(
            err,
            AuthError::Validation(ValidationError::MissingLoginFields)
        ));

        let err = manager
            .register(&RegistrationForm::new("Ann", "a@b.c", ""))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Name, email, and password are required.");

        assert!(stub.calls().is_empty());
        assert_eq!(store.get().unwrap(), None);
    }

    #[tokio::test]
    async fn test_rejected_login_is_generic() {
        let stub = Arc::new(StubGateway::new().with_login(Err(stub_failure("login"))));
        let (manager, store) = setup(stub);

        let err = manager
            .login(&LoginForm::new("a@b.c", "wrong"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::LoginFailed));
        assert_eq!(
            err.to_string(),
            "Login failed. Please check your credentials and try again."
        );
        assert_eq!(store.get().unwrap(), None);
    }

    #[tokio::test]
    async fn test_login_without_token_is_invalid_response() {
        let stub = Arc::new(StubGateway::new().with_login(Ok(TokenResponse { token: None })));
        let (manager, store) = setup(stub);

        let err = manager
            .login(&LoginForm::new("a@b.c", "secret"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidResponse));
        assert_eq!(store.get().unwrap(), None);
    }

    #[tokio::test]
    async fn test_register_stores_token_or_fails_generically() {
        let stub = Arc::new(StubGateway::new());
        let (manager, store) = setup(stub);
        manager
            .register(&RegistrationForm::new("Ann", "a@b.c", "secret"))
            .await
            .unwrap();
        assert_eq!(current_token(store.as_ref()).as_deref(), Some("stub-token"));

        let stub = Arc::new(StubGateway::new().with_register(Ok(TokenResponse {
            token: Some(String::new()),
        })));
        let (manager, store) = setup(stub);
        let err = manager
            .register(&RegistrationForm::new("Ann", "a@b.c", "secret"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::RegistrationFailed));
        assert_eq!(store.get().unwrap(), None);
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let stub = Arc::new(StubGateway::new());
        let (manager, _store) = setup(stub);
        manager
            .login(&LoginForm::new("a@b.c", "secret"))
            .await
            .unwrap();

        manager.logout().unwrap();
        assert!(!manager.is_authenticated());
    }

    #[tokio::test]
    async fn test_ttl_override_is_applied() {
        let stub = Arc::new(StubGateway::new());
        let store = Arc::new(MemorySessionStore::new());
        let manager = SessionManager::new(store.clone(), stub).with_ttl(0);

        manager
            .login(&LoginForm::new("a@b.c", "secret"))
            .await
            .unwrap();
        // A zero ttl credential is already expired
        assert!(!manager.is_authenticated());
    }
}
