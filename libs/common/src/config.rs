//! Client configuration
//!
//! Configuration is assembled with the `config` crate from built-in defaults
//! overridden by `NEWS_PORTAL_*` environment variables.

use config::{Config, Environment};
use serde::Deserialize;
use std::path::PathBuf;
use url::Url;

use crate::error::{ConfigError, ConfigResult};
use crate::session::DEFAULT_SESSION_TTL_SECS;

/// Prefix shared by every configuration environment variable
pub const ENV_PREFIX: &str = "NEWS_PORTAL";

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_SCRAPE_GRACE_SECS: u64 = 2;

/// Where the session credential is persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionBackend {
    /// JSON file on local disk
    File(PathBuf),
    /// Redis key with a server-side expiry
    Redis(String),
}

/// Resolved client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the news backend, without a trailing slash
    pub api_base_url: String,
    /// Session credential storage
    pub session_backend: SessionBackend,
    /// Lifetime of a stored credential in seconds (default: 1 day)
    pub session_ttl_secs: u64,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Seconds the binary waits for the scrape trigger before exiting
    pub scrape_grace_secs: u64,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    api_base_url: String,
    session_backend: String,
    session_file: Option<PathBuf>,
    redis_url: String,
    session_ttl_secs: u64,
    log_level: String,
    scrape_grace_secs: u64,
}

impl ClientConfig {
    /// Create a new ClientConfig from environment variables
    ///
    /// # Environment Variables
    /// - `NEWS_PORTAL_API_BASE_URL`: backend base URL (default: "http://localhost:8000/api")
    /// - `NEWS_PORTAL_SESSION_BACKEND`: "file" or "redis" (default: "file")
    /// - `NEWS_PORTAL_SESSION_FILE`: session file path (default: "~/.news-portal/session.json")
    /// - `NEWS_PORTAL_REDIS_URL`: Redis URL for the redis backend (default: "redis://localhost:6379")
    /// - `NEWS_PORTAL_SESSION_TTL_SECS`: credential lifetime (default: 86400)
    /// - `NEWS_PORTAL_LOG_LEVEL`: default log filter (default: "info")
    /// - `NEWS_PORTAL_SCRAPE_GRACE_SECS`: scrape trigger grace period (default: 2)
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_environment(Environment::with_prefix(ENV_PREFIX))
    }

    /// Build the configuration from an explicit environment source
    pub fn from_environment(environment: Environment) -> ConfigResult<Self> {
        let raw: RawConfig = Config::builder()
            .set_default("api_base_url", DEFAULT_API_BASE_URL)?
            .set_default("session_backend", "file")?
            .set_default("redis_url", DEFAULT_REDIS_URL)?
            .set_default("session_ttl_secs", DEFAULT_SESSION_TTL_SECS as i64)?
            .set_default("log_level", DEFAULT_LOG_LEVEL)?
            .set_default("scrape_grace_secs", DEFAULT_SCRAPE_GRACE_SECS as i64)?
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()?;

        let api_base_url = normalize_base_url(&raw.api_base_url)?;

        let session_backend = match raw.session_backend.trim().to_ascii_lowercase().as_str() {
            "file" => SessionBackend::File(raw.session_file.unwrap_or_else(default_session_file)),
            "redis" => SessionBackend::Redis(raw.redis_url),
            other => return Err(ConfigError::UnknownBackend(other.to_string())),
        };

        Ok(ClientConfig {
            api_base_url,
            session_backend,
            session_ttl_secs: raw.session_ttl_secs,
            log_level: raw.log_level,
            scrape_grace_secs: raw.scrape_grace_secs,
        })
    }
}

fn normalize_base_url(raw: &str) -> ConfigResult<String> {
    let parsed = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidBaseUrl(format!("{}: {}", raw, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl(format!(
            "{}: unsupported scheme {}",
            raw,
            parsed.scheme()
        )));
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

fn default_session_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".news-portal")
        .join("session.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn environment(vars: &[(&str, &str)]) -> Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX).source(Some(source))
    }

    #[test]
    fn test_client_config_defaults() {
        let config = ClientConfig::from_environment(environment(&[]))
            .expect("Failed to create client config");

        assert_eq!(config.api_base_url, "http://localhost:8000/api");
        assert_eq!(config.session_ttl_secs, 86_400);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.scrape_grace_secs, 2);
        match config.session_backend {
            SessionBackend::File(path) => assert!(path.ends_with(".news-portal/session.json")),
            other => panic!("unexpected backend: {:?}", other),
        }
    }

    #[test]
    fn test_client_config_overrides() {
        let config = ClientConfig::from_environment(environment(&[
            ("NEWS_PORTAL_API_BASE_URL", "https://news.example.com/api/"),
            ("NEWS_PORTAL_SESSION_BACKEND", "redis"),
            ("NEWS_PORTAL_REDIS_URL", "redis://cache:6379"),
            ("NEWS_PORTAL_SESSION_TTL_SECS", "60"),
        ]))
        .expect("Failed to create client config");

        assert_eq!(config.api_base_url, "https://news.example.com/api");
        assert_eq!(
            config.session_backend,
            SessionBackend::Redis("redis://cache:6379".to_string())
        );
        assert_eq!(config.session_ttl_secs, 60);
    }

    #[test]
    fn test_client_config_rejects_bad_values() {
        let err = ClientConfig::from_environment(environment(&[(
            "NEWS_PORTAL_API_BASE_URL",
            "not a url",
        )]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl(_)));

        let err = ClientConfig::from_environment(environment(&[(
            "NEWS_PORTAL_SESSION_BACKEND",
            "cookie-jar",
        )]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownBackend(_)));
    }
}
