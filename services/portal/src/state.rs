//! Client state shared across views

use std::sync::Arc;

use api::gateway::{HttpGateway, SharedGateway};
use auth::SessionManager;
use common::config::ClientConfig;
use common::error::SessionResult;
use common::session::{SharedSessionStore, open_store};

/// Client state shared across views
#[derive(Clone)]
pub struct PortalState {
    pub store: SharedSessionStore,
    pub gateway: SharedGateway,
    pub sessions: SessionManager,
}

impl PortalState {
    /// Wire a store and a gateway together
    pub fn new(store: SharedSessionStore, gateway: SharedGateway) -> Self {
        let sessions = SessionManager::new(store.clone(), gateway.clone());
        Self {
            store,
            gateway,
            sessions,
        }
    }

    /// Build the state described by `config`
    pub fn from_config(config: &ClientConfig) -> SessionResult<Self> {
        let store = open_store(&config.session_backend)?;
        let gateway: SharedGateway =
            Arc::new(HttpGateway::new(config.api_base_url.clone(), store.clone()));

        let sessions =
            SessionManager::new(store.clone(), gateway.clone()).with_ttl(config.session_ttl_secs);

        Ok(Self {
            store,
            gateway,
            sessions,
        })
    }
}
