//! Auth session: the only shared mutable state in the client.
//!
//! [`SessionHandle`] is a cloneable capability passed explicitly to whoever
//! needs the token. Reads happen at dispatch time; writes go through
//! [`SessionHandle::establish`] and [`SessionHandle::clear`] only.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("session storage is corrupt: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// What survives a restart, stored under a fixed key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    pub token: Option<String>,
    pub is_authenticated: bool,
}

#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self) -> Result<Option<PersistedSession>, SessionError>;
    async fn save(&self, session: &PersistedSession) -> Result<(), SessionError>;
    async fn remove(&self) -> Result<(), SessionError>;
}

/// Key/value JSON file: each key maps to a JSON-encoded string value.
pub struct FileTokenStore {
    path: PathBuf,
    key: String,
    lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
            lock: Mutex::new(()),
        }
    }

    async fn read_all(&self) -> Result<HashMap<String, String>, SessionError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(HashMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_all(&self, entries: &HashMap<String, String>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&self.path, serde_json::to_vec_pretty(entries)?).await?;
        Ok(())
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<PersistedSession>, SessionError> {
        let _guard = self.lock.lock().await;
        let entries = self.read_all().await?;
        match entries.get(&self.key) {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, session: &PersistedSession) -> Result<(), SessionError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_all().await?;
        entries.insert(self.key.clone(), serde_json::to_string(session)?);
        self.write_all(&entries).await
    }

    async fn remove(&self) -> Result<(), SessionError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_all().await?;
        if entries.remove(&self.key).is_some() {
            self.write_all(&entries).await?;
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryTokenStore {
    value: Mutex<Option<PersistedSession>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: PersistedSession) -> Self {
        Self {
            value: Mutex::new(Some(session)),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<PersistedSession>, SessionError> {
        Ok(self.value.lock().await.clone())
    }

    async fn save(&self, session: &PersistedSession) -> Result<(), SessionError> {
        *self.value.lock().await = Some(session.clone());
        Ok(())
    }

    async fn remove(&self) -> Result<(), SessionError> {
        *self.value.lock().await = None;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ExpiryClaim {
    exp: Option<i64>,
}

/// Reads the `exp` claim without verifying the signature; the server is the
/// authority on validity, the client only needs to know when to stop trying.
pub fn decode_expiry(token: &str) -> Option<DateTime<Utc>> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<ExpiryClaim>(token, &DecodingKey::from_secret(&[]), &validation).ok()?;
    data.claims
        .exp
        .and_then(|exp| Utc.timestamp_opt(exp, 0).single())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_authenticated: bool,
}

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    expires_at: Option<DateTime<Utc>>,
}

impl SessionState {
    fn is_authenticated(&self, now: DateTime<Utc>) -> bool {
        self.token.is_some() && self.expires_at.is_none_or(|exp| exp > now)
    }
}

struct SessionInner {
    state: RwLock<SessionState>,
    epoch: AtomicU64,
    store: Arc<dyn TokenStore>,
}

#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<SessionInner>,
}

impl SessionHandle {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                state: RwLock::new(SessionState::default()),
                epoch: AtomicU64::new(0),
                store,
            }),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()))
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.inner.state.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, SessionState> {
        self.inner.state.write().unwrap_or_else(|p| p.into_inner())
    }

    /// Restores a persisted session at startup. Expired tokens are discarded.
    pub async fn rehydrate(&self) -> Result<bool, SessionError> {
        let Some(persisted) = self.inner.store.load().await? else {
            return Ok(false);
        };
        let Some(token) = persisted.token.filter(|_| persisted.is_authenticated) else {
            return Ok(false);
        };

        let expires_at = decode_expiry(&token);
        if expires_at.is_some_and(|exp| exp <= Utc::now()) {
            tracing::info!("Persisted session has expired, discarding");
            self.inner.store.remove().await?;
            return Ok(false);
        }

        {
            let mut state = self.write();
            state.token = Some(token);
            state.expires_at = expires_at;
        }
        self.inner.epoch.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }

    /// Stores a freshly issued token (login or refresh) and persists it.
    pub async fn establish(&self, token: &str) -> Result<(), SessionError> {
        {
            let mut state = self.write();
            state.token = Some(token.to_string());
            state.expires_at = decode_expiry(token);
        }
        self.inner.epoch.fetch_add(1, Ordering::SeqCst);
        self.inner
            .store
            .save(&PersistedSession {
                token: Some(token.to_string()),
                is_authenticated: true,
            })
            .await
    }

    /// Drops the token from memory and storage. Idempotent.
    pub async fn clear(&self) -> Result<(), SessionError> {
        {
            let mut state = self.write();
            state.token = None;
            state.expires_at = None;
        }
        self.inner.store.remove().await
    }

    /// The token to attach right now, read at dispatch time.
    pub fn bearer(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated(Utc::now())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.read();
        SessionSnapshot {
            token: state.token.clone(),
            expires_at: state.expires_at,
            is_authenticated: state.is_authenticated(Utc::now()),
        }
    }

    /// Incremented on every login/refresh/rehydrate; never on clear.
    pub fn epoch(&self) -> u64 {
        self.inner.epoch.load(Ordering::SeqCst)
    }
}
