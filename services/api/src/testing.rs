//! In-memory gateway for tests
//!
//! Every operation returns a configurable canned result and records its
//! name, so tests can assert on what reached the backend.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::error::{GatewayError, GatewayResult};
use crate::gateway::NewsGateway;
use crate::models::{
    LoginRequest, RegisterRequest, TokenResponse,
    news::NewsItem,
    preferences::{AuthorEntry, AuthorPreferences, SourcePreferences},
};

/// Canned-response implementation of [`NewsGateway`]
pub struct StubGateway {
    login: Mutex<GatewayResult<TokenResponse>>,
    register: Mutex<GatewayResult<TokenResponse>>,
    news: Mutex<GatewayResult<Vec<NewsItem>>>,
    authors: Mutex<GatewayResult<Vec<AuthorEntry>>>,
    source_prefs: Mutex<GatewayResult<SourcePreferences>>,
    author_prefs: Mutex<GatewayResult<AuthorPreferences>>,
    set_source: Mutex<GatewayResult<()>>,
    set_author: Mutex<GatewayResult<()>>,
    scrape: Mutex<GatewayResult<String>>,
    calls: Mutex<Vec<&'static str>>,
    saved_sources: Mutex<Vec<SourcePreferences>>,
    saved_authors: Mutex<Vec<AuthorPreferences>>,
}

impl Default for StubGateway {
    fn default() -> Self {
        Self {
            login: Mutex::new(Ok(token("stub-token"))),
            register: Mutex::new(Ok(token("stub-token"))),
            news: Mutex::new(Ok(Vec::new())),
            authors: Mutex::new(Ok(Vec::new())),
            source_prefs: Mutex::new(Ok(SourcePreferences::default())),
            author_prefs: Mutex::new(Ok(AuthorPreferences::default())),
            set_source: Mutex::new(Ok(())),
            set_author: Mutex::new(Ok(())),
            scrape: Mutex::new(Ok(String::new())),
            calls: Mutex::new(Vec::new()),
            saved_sources: Mutex::new(Vec::new()),
            saved_authors: Mutex::new(Vec::new()),
        }
    }
}

fn token(value: &str) -> TokenResponse {
    TokenResponse {
        token: Some(value.to_string()),
    }
}

/// The error every failing stub operation returns
pub fn stub_failure(operation: &'static str) -> GatewayError {
    GatewayError::request_failed(operation, "stubbed failure")
}

fn replace<T>(slot: &Mutex<T>, value: T) {
    *slot.lock().expect("stub lock poisoned") = value;
}

fn read<T: Clone>(slot: &Mutex<T>) -> T {
    slot.lock().expect("stub lock poisoned").clone()
}

impl StubGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_login(self, result: GatewayResult<TokenResponse>) -> Self {
        replace(&self.login, result);
        self
    }

    pub fn with_register(self, result: GatewayResult<TokenResponse>) -> Self {
        replace(&self.register, result);
        self
    }

    pub fn with_news(self, result: GatewayResult<Vec<NewsItem>>) -> Self {
        replace(&self.news, result);
        self
    }

    pub fn with_authors<I, S>(self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = authors
            .into_iter()
            .map(|author| AuthorEntry {
                author: author.into(),
            })
            .collect();
        replace(&self.authors, Ok(entries));
        self
    }

    pub fn with_authors_result(self, result: GatewayResult<Vec<AuthorEntry>>) -> Self {
        replace(&self.authors, result);
        self
    }

    pub fn with_source_prefs(self, result: GatewayResult<SourcePreferences>) -> Self {
        replace(&self.source_prefs, result);
        self
    }

    pub fn with_author_prefs(self, result: GatewayResult<AuthorPreferences>) -> Self {
        replace(&self.author_prefs, result);
        self
    }

    pub fn with_scrape(self, result: GatewayResult<String>) -> Self {
        replace(&self.scrape, result);
        self
    }

    /// Change the outcome of later `set_source_prefs` calls
    pub fn set_source_outcome(&self, result: GatewayResult<()>) {
        replace(&self.set_source, result);
    }

    /// Change the outcome of later `set_author_prefs` calls
    pub fn set_author_outcome(&self, result: GatewayResult<()>) {
        replace(&self.set_author, result);
    }

    /// Names of the operations called so far, in call order
    pub fn calls(&self) -> Vec<&'static str> {
        read(&self.calls)
    }

    /// Payloads of successful `set_source_prefs` calls
    pub fn saved_sources(&self) -> Vec<SourcePreferences> {
        read(&self.saved_sources)
    }

    /// Payloads of successful `set_author_prefs` calls
    pub fn saved_authors(&self) -> Vec<AuthorPreferences> {
        read(&self.saved_authors)
    }

    fn record(&self, operation: &'static str) {
        self.calls
            .lock()
            .expect("stub lock poisoned")
            .push(operation);
    }
}

#[async_trait]
impl NewsGateway for StubGateway {
    async fn login(&self, _request: &LoginRequest) -> GatewayResult<TokenResponse> {
        self.record("login");
        read(&self.login)
    }

    async fn register(&self, _request: &RegisterRequest) -> GatewayResult<TokenResponse> {
        self.record("register");
        read(&self.register)
    }

    async fn list_news(&self) -> GatewayResult<Vec<NewsItem>> {
        self.record("list_news");
        read(&self.news)
    }

    async fn list_authors(&self) -> GatewayResult<Vec<AuthorEntry>> {
        self.record("list_authors");
        read(&self.authors)
    }

    async fn get_source_prefs(&self) -> GatewayResult<SourcePreferences> {
        self.record("get_source_prefs");
        read(&self.source_prefs)
    }

    async fn set_source_prefs(&self, prefs: &SourcePreferences) -> GatewayResult<()> {
        self.record("set_source_prefs");
        let result = read(&self.set_source);
        if result.is_ok() {
            self.saved_sources
                .lock()
                .expect("stub lock poisoned")
                .push(prefs.clone());
        }
        result
    }

    async fn get_author_prefs(&self) -> GatewayResult<AuthorPreferences> {
        self.record("get_author_prefs");
        read(&self.author_prefs)
    }

    async fn set_author_prefs(&self, prefs: &AuthorPreferences) -> GatewayResult<()> {
        self.record("set_author_prefs");
        let result = read(&self.set_author);
        if result.is_ok() {
            self.saved_authors
                .lock()
                .expect("stub lock poisoned")
                .push(prefs.clone());
        }
        result
    }

    async fn trigger_scrape(&self) -> GatewayResult<String> {
        self.record("trigger_scrape");
        read(&self.scrape)
    }
}
