//! Remote gateway to the news backend
//!
//! Every backend call goes through [`NewsGateway`]. The HTTP implementation
//! attaches the stored bearer credential to protected calls and reports any
//! failure as [`GatewayError::RequestFailed`]. Nothing is retried.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use common::session::{SharedSessionStore, current_token};

use crate::error::{GatewayError, GatewayResult};
use crate::models::{
    LoginRequest, RegisterRequest, TokenResponse,
    news::{NewsItem, NewsListResponse},
    preferences::{AuthorEntry, AuthorListResponse, AuthorPreferences, SourcePreferences},
};

/// Backend operations used by the client
#[async_trait]
pub trait NewsGateway: Send + Sync {
    /// `POST /login`
    async fn login(&self, request: &LoginRequest) -> GatewayResult<TokenResponse>;

    /// `POST /register`
    async fn register(&self, request: &RegisterRequest) -> GatewayResult<TokenResponse>;

    /// `GET /news`, in backend order
    async fn list_news(&self) -> GatewayResult<Vec<NewsItem>>;

    /// `GET /preferences/author/list`
    async fn list_authors(&self) -> GatewayResult<Vec<AuthorEntry>>;

    /// `GET /preferences/source`
    async fn get_source_prefs(&self) -> GatewayResult<SourcePreferences>;

    /// `POST /preferences/source`
    async fn set_source_prefs(&self, prefs: &SourcePreferences) -> GatewayResult<()>;

    /// `GET /preferences/author`
    async fn get_author_prefs(&self) -> GatewayResult<AuthorPreferences>;

    /// `POST /preferences/author`
    async fn set_author_prefs(&self, prefs: &AuthorPreferences) -> GatewayResult<()>;

    /// `GET /scrap-news`, returning the raw response body
    async fn trigger_scrape(&self) -> GatewayResult<String>;
}

/// Shared handle to a gateway implementation
pub type SharedGateway = Arc<dyn NewsGateway>;

/// HTTP implementation of [`NewsGateway`]
#[derive(Clone)]
pub struct HttpGateway {
    http: Client,
    base_url: String,
    session: SharedSessionStore,
}

impl HttpGateway {
    /// Create a gateway for `base_url` reading credentials from `session`
    pub fn new(base_url: impl Into<String>, session: SharedSessionStore) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!("Gateway initialized with base URL: {}", base_url);

        Self {
            http: Client::new(),
            base_url,
            session,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the bearer credential when one is stored
    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match current_token(self.session.as_ref()) {
            Some(token) => builder.bearer_auth(token),
            None => {
                debug!("No session credential to attach");
                builder
            }
        }
    }

    async fn execute(
        &self,
        operation: &'static str,
        builder: RequestBuilder,
    ) -> GatewayResult<reqwest::Response> {
        let response = builder.send().await.map_err(|e| {
            warn!("{} request failed: {}", operation, e);
            GatewayError::request_failed(operation, e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("{} returned status {}", operation, status);
            return Err(GatewayError::request_failed(
                operation,
                format!("unexpected status {}", status),
            ));
        }

        debug!("{} succeeded with status {}", operation, status);
        Ok(response)
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        builder: RequestBuilder,
    ) -> GatewayResult<T> {
        self.execute(operation, builder)
            .await?
            .json::<T>()
            .await
            .map_err(|e| {
                warn!("{} returned an undecodable body: {}", operation, e);
                GatewayError::request_failed(operation, e)
            })
    }
}

#[async_trait]
impl NewsGateway for HttpGateway {
    async fn login(&self, request: &LoginRequest) -> GatewayResult<TokenResponse> {
        let builder = self.http.post(self.url("/login")).json(request);
        self.fetch_json("login", builder).await
    }

    async fn register(&self, request: &RegisterRequest) -> GatewayResult<TokenResponse> {
        let builder = self.http.post(self.url("/register")).json(request);
        self.fetch_json("register", builder).await
    }

    async fn list_news(&self) -> GatewayResult<Vec<NewsItem>> {
        let builder = self.authorized(self.http.get(self.url("/news")));
        let response: NewsListResponse = self.fetch_json("list_news", builder).await?;
        Ok(response.results)
    }

    async fn list_authors(&self) -> GatewayResult<Vec<AuthorEntry>> {
        let builder = self.authorized(self.http.get(self.url("/preferences/author/list")));
        let response: AuthorListResponse = self.fetch_json("list_authors", builder).await?;
        Ok(response.results)
    }

    async fn get_source_prefs(&self) -> GatewayResult<SourcePreferences> {
        let builder = self.authorized(self.http.get(self.url("/preferences/source")));
        self.fetch_json("get_source_prefs", builder).await
    }

    async fn set_source_prefs(&self, prefs: &SourcePreferences) -> GatewayResult<()> {
        let builder = self.authorized(self.http.post(self.url("/preferences/source")).json(prefs));
        self.execute("set_source_prefs", builder).await?;
        Ok(())
    }

    async fn get_author_prefs(&self) -> GatewayResult<AuthorPreferences> {
        let builder = self.authorized(self.http.get(self.url("/preferences/author")));
        self.fetch_json("get_author_prefs", builder).await
    }

    async fn set_author_prefs(&self, prefs: &AuthorPreferences) -> GatewayResult<()> {
        let builder = self.authorized(self.http.post(self.url("/preferences/author")).json(prefs));
        self.execute("set_author_prefs", builder).await?;
        Ok(())
    }

    async fn trigger_scrape(&self) -> GatewayResult<String> {
        // Sent without a credential
        let builder = self.http.get(self.url("/scrap-news"));
        self.execute("trigger_scrape", builder)
            .await?
            .text()
            .await
            .map_err(|e| GatewayError::request_failed("trigger_scrape", e))
    }
}

/// Fire the scrape trigger in the background
///
/// The outcome is only logged. Nothing else waits on it; the handle lets a
/// process give it a grace period before exiting.
pub fn spawn_scrape_trigger(gateway: SharedGateway) -> JoinHandle<()> {
    tokio::spawn(async move {
        match gateway.trigger_scrape().await {
            Ok(body) => info!("News scrape trigger response: {}", body),
            Err(e) => warn!("News scrape trigger failed: {}", e),
        }
    })
}
