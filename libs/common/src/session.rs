//! Session credential storage
//!
//! The client holds exactly one bearer credential. It is written by the
//! login, register and logout flows and read by everything else. Backends
//! evict the credential once its ttl has elapsed; nothing here inspects the
//! token itself.

use chrono::{DateTime, TimeDelta, Utc};
use redis::{Client, Commands};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use crate::config::SessionBackend;
use crate::error::{SessionError, SessionResult};

/// Credential lifetime used by the login and register flows (1 day)
pub const DEFAULT_SESSION_TTL_SECS: u64 = 86_400;

const REDIS_SESSION_KEY: &str = "news-portal:session";

/// Stored bearer credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCredential {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl SessionCredential {
    /// Create a credential expiring `ttl_seconds` from now
    pub fn issue(token: impl Into<String>, ttl_seconds: u64) -> Self {
        let expires_at = i64::try_from(ttl_seconds)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// Whether the credential has reached its expiry
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Durable holder of the single session credential
pub trait SessionStore: Send + Sync {
    /// Read the current credential, `None` when absent or expired
    fn get(&self) -> SessionResult<Option<SessionCredential>>;

    /// Replace the credential with `token`, valid for `ttl_seconds`
    fn set(&self, token: &str, ttl_seconds: u64) -> SessionResult<()>;

    /// Remove the credential
    fn clear(&self) -> SessionResult<()>;
}

/// Shared handle passed to every component that needs the session
pub type SharedSessionStore = Arc<dyn SessionStore>;

/// Read the current bearer token, treating store failures as "no session"
pub fn current_token(store: &dyn SessionStore) -> Option<String> {
    match store.get() {
        Ok(credential) => credential.map(|c| c.token),
        Err(e) => {
            warn!("Failed to read session credential: {}", e);
            None
        }
    }
}

/// Open the store selected by configuration
pub fn open_store(backend: &SessionBackend) -> SessionResult<SharedSessionStore> {
    match backend {
        SessionBackend::File(path) => Ok(Arc::new(FileSessionStore::new(path.clone()))),
        SessionBackend::Redis(url) => Ok(Arc::new(RedisSessionStore::new(url)?)),
    }
}

/// In-process session store
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    credential: Mutex<Option<SessionCredential>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `token` valid for the default ttl
    pub fn with_token(token: &str) -> Self {
        Self {
            credential: Mutex::new(Some(SessionCredential::issue(
                token,
                DEFAULT_SESSION_TTL_SECS,
            ))),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> SessionResult<Option<SessionCredential>> {
        let mut slot = self.credential.lock().map_err(|_| SessionError::Poisoned)?;
        if slot.as_ref().is_some_and(SessionCredential::is_expired) {
            debug!("Evicting expired in-memory session");
            *slot = None;
        }
        Ok(slot.clone())
    }

    fn set(&self, token: &str, ttl_seconds: u64) -> SessionResult<()> {
        let mut slot = self.credential.lock().map_err(|_| SessionError::Poisoned)?;
        *slot = Some(SessionCredential::issue(token, ttl_seconds));
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        let mut slot = self.credential.lock().map_err(|_| SessionError::Poisoned)?;
        *slot = None;
        Ok(())
    }
}

/// Session store persisted as a JSON file
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn remove_file(&self) -> SessionResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> SessionResult<Option<SessionCredential>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let credential: SessionCredential = serde_json::from_str(&contents)?;
        if credential.is_expired() {
            info!("Session file {} has expired", self.path.display());
            self.remove_file()?;
            return Ok(None);
        }

        Ok(Some(credential))
    }

    fn set(&self, token: &str, ttl_seconds: u64) -> SessionResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let credential = SessionCredential::issue(token, ttl_seconds);
        let mut file = open_owner_only(&self.path)?;
        file.write_all(&serde_json::to_vec_pretty(&credential)?)?;
        debug!("Session written to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        self.remove_file()
    }
}

// The file holds a bearer token: owner read/write only, also when an older
// file with wider permissions is being overwritten
#[cfg(unix)]
fn open_owner_only(path: &Path) -> std::io::Result<File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_owner_only(path: &Path) -> std::io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

/// Session store backed by a Redis key with a server-side expiry
pub struct RedisSessionStore {
    client: Client,
}

impl RedisSessionStore {
    /// Create a store for the Redis server at `url`
    pub fn new(url: &str) -> SessionResult<Self> {
        let client = Client::open(url)?;
        info!("Redis session store initialized with URL: {}", url);
        Ok(Self { client })
    }

    fn connection(&self) -> SessionResult<redis::Connection> {
        Ok(self.client.get_connection()?)
    }
}

impl SessionStore for RedisSessionStore {
    fn get(&self) -> SessionResult<Option<SessionCredential>> {
        let mut conn = self.connection()?;
        let token: Option<String> = conn.get(REDIS_SESSION_KEY)?;

        let Some(token) = token else {
            return Ok(None);
        };

        // -1 means no expiry, -2 means the key vanished between calls
        let remaining: i64 = conn.ttl(REDIS_SESSION_KEY)?;
        match remaining {
            -2 => Ok(None),
            -1 => Ok(Some(SessionCredential {
                token,
                expires_at: DateTime::<Utc>::MAX_UTC,
            })),
            secs => Ok(Some(SessionCredential::issue(token, secs.max(0) as u64))),
        }
    }

    fn set(&self, token: &str, ttl_seconds: u64) -> SessionResult<()> {
        let mut conn = self.connection()?;
        if ttl_seconds == 0 {
            let _: u64 = conn.del(REDIS_SESSION_KEY)?;
            return Ok(());
        }

        let _: () = conn.set_ex(REDIS_SESSION_KEY, token, ttl_seconds)?;
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        let mut conn = self.connection()?;
        let _: u64 = conn.del(REDIS_SESSION_KEY)?;
        Ok(())
    }
}
