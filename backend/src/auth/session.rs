//! Server-side sessions
//!
//! A session slot is keyed by an opaque token carried in an `HttpOnly`
//! cookie and holds at most one principal. Only the principal's kind and
//! identifier are stored; handlers re-read the full record per request.
//!
//! State machine per slot:
//!
//! ```text
//! Anonymous --establish--> Authenticated(principal) --end--> Anonymous
//! ```

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};
use hall_complaints_shared::PrincipalKind;
use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::identity::Principal;
use crate::config::SessionConfig;

/// Identity stored in a session slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPrincipal {
    pub kind: PrincipalKind,
    pub id: String,
}

/// State of the session presented by a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated(SessionPrincipal),
}

impl SessionState {
    pub fn principal(&self) -> Option<&SessionPrincipal> {
        match self {
            SessionState::Anonymous => None,
            SessionState::Authenticated(principal) => Some(principal),
        }
    }
}

/// Storage for session slots
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, token: &str) -> Result<Option<SessionPrincipal>>;

    async fn save(&self, token: &str, principal: &SessionPrincipal, ttl: Duration) -> Result<()>;

    /// Removing a missing slot is not an error
    async fn remove(&self, token: &str) -> Result<()>;

    async fn health_check(&self) -> Result<()>;
}

/// Process-local session store
#[derive(Default)]
pub struct MemorySessionStore {
    slots: RwLock<HashMap<String, (SessionPrincipal, Instant)>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live slots
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.slots
            .read()
            .await
            .values()
            .filter(|(_, expires_at)| *expires_at > now)
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, token: &str) -> Result<Option<SessionPrincipal>> {
        let now = Instant::now();
        {
            let slots = self.slots.read().await;
            match slots.get(token) {
                None => return Ok(None),
                Some((principal, expires_at)) if *expires_at > now => {
                    return Ok(Some(principal.clone()))
                }
                Some(_) => {}
            }
        }
        // Expired: drop it
        self.slots.write().await.remove(token);
        Ok(None)
    }

    async fn save(&self, token: &str, principal: &SessionPrincipal, ttl: Duration) -> Result<()> {
        let now = Instant::now();
        let mut slots = self.slots.write().await;
        // Abandoned slots are never presented again; drop them here
        slots.retain(|_, (_, expires_at)| *expires_at > now);
        slots.insert(token.to_string(), (principal.clone(), now + ttl));
        Ok(())
    }

    async fn remove(&self, token: &str) -> Result<()> {
        self.slots.write().await.remove(token);
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

/// Redis-backed session store, shared between server instances
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: ConnectionManager,
}

impl RedisSessionStore {
    const KEY_PREFIX: &'static str = "session:";

    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    fn key(token: &str) -> String {
        format!("{}{}", Self::KEY_PREFIX, token)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, token: &str) -> Result<Option<SessionPrincipal>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = redis::cmd("GET")
            .arg(Self::key(token))
            .query_async(&mut conn)
            .await
            .context("failed to load session")?;

        value
            .map(|json| serde_json::from_str(&json).context("corrupt session slot"))
            .transpose()
    }

    async fn save(&self, token: &str, principal: &SessionPrincipal, ttl: Duration) -> Result<()> {
        let mut conn = self.conn.clone();
        let json = serde_json::to_string(principal)?;
        redis::cmd("SET")
            .arg(Self::key(token))
            .arg(json)
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async::<_, ()>(&mut conn)
            .await
            .context("failed to save session")
    }

    async fn remove(&self, token: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        redis::cmd("DEL")
            .arg(Self::key(token))
            .query_async::<_, ()>(&mut conn)
            .await
            .context("failed to delete session")
    }

    async fn health_check(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map(|_| ())
            .context("redis ping failed")
    }
}

/// Establishes, restores and ends sessions; also owns the cookie format
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    ttl: Duration,
    cookie_name: String,
    cookie_secure: bool,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, config: &SessionConfig) -> Self {
        Self {
            store,
            ttl: Duration::from_secs(config.ttl_secs),
            cookie_name: config.cookie_name.clone(),
            cookie_secure: config.cookie_secure,
        }
    }

    pub fn store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }

    /// Attach `principal` to a fresh slot and return its token
    ///
    /// A previous slot presented by the same client is removed, so the
    /// client never holds two principals.
    pub async fn establish(&self, previous: Option<&str>, principal: &Principal) -> Result<String> {
        if let Some(previous) = previous {
            self.store.remove(previous).await?;
        }

        let token = Uuid::new_v4().simple().to_string();
        self.store
            .save(&token, &principal.session_principal(), self.ttl)
            .await?;

        debug!(kind = %principal.kind(), id = principal.id(), "Session established");
        Ok(token)
    }

    /// Look up the slot for `token` without re-checking credentials
    pub async fn restore(&self, token: &str) -> Result<SessionState> {
        Ok(match self.store.load(token).await? {
            Some(principal) => SessionState::Authenticated(principal),
            None => SessionState::Anonymous,
        })
    }

    /// Clear the slot; ending an anonymous or unknown session is a no-op
    pub async fn end(&self, token: Option<&str>) -> Result<()> {
        if let Some(token) = token {
            self.store.remove(token).await?;
        }
        Ok(())
    }

    /// Session token from the request's `Cookie` header
    pub fn token_from_headers(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(key, _)| key.trim() == self.cookie_name)
            .map(|(_, value)| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    /// `Set-Cookie` value carrying `token`
    pub fn cookie(&self, token: &str) -> Result<HeaderValue, InvalidHeaderValue> {
        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.cookie_name,
            token,
            self.ttl.as_secs()
        );
        if self.cookie_secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie)
    }

    /// `Set-Cookie` value that removes the session cookie
    pub fn clear_cookie(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        let mut cookie = format!(
            "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
            self.cookie_name
        );
        if self.cookie_secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::StudentRecord;
    use chrono::Utc;

    fn manager_with(store: Arc<MemorySessionStore>, ttl_secs: u64) -> SessionManager {
        let config = SessionConfig {
            ttl_secs,
            ..SessionConfig::default()
        };
        SessionManager::new(store, &config)
    }

    fn student(matric_number: &str) -> Principal {
        Principal::Student(StudentRecord {
            matric_number: matric_number.to_string(),
            name: "Ada".to_string(),
            password_hash: "$2b$04$secret".to_string(),
            logged_in: true,
            created_at: Utc::now(),
        })
    }

    #[tokio::test]
    async fn test_establish_then_restore() {
        let manager = manager_with(Arc::new(MemorySessionStore::new()), 3600);

        let token = manager.establish(None, &student("U1001")).await.unwrap();
        let state = manager.restore(&token).await.unwrap();

        assert_eq!(
            state,
            SessionState::Authenticated(SessionPrincipal {
                kind: PrincipalKind::Student,
                id: "U1001".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_unknown_token_is_anonymous() {
        let manager = manager_with(Arc::new(MemorySessionStore::new()), 3600);
        let state = manager.restore("no-such-token").await.unwrap();
        assert_eq!(state, SessionState::Anonymous);
        assert!(state.principal().is_none());
    }

    #[tokio::test]
    async fn test_slot_does_not_hold_password_digest() {
        let principal = student("U1001").session_principal();
        let json = serde_json::to_string(&principal).unwrap();
        assert!(!json.contains("secret"));
        assert_eq!(json, r#"{"kind":"student","id":"U1001"}"#);
    }

    #[tokio::test]
    async fn test_end_is_idempotent() {
        let store = Arc::new(MemorySessionStore::new());
        let manager = manager_with(store.clone(), 3600);
        let token = manager.establish(None, &student("U1001")).await.unwrap();

        manager.end(Some(&token)).await.unwrap();
        manager.end(Some(&token)).await.unwrap();
        manager.end(None).await.unwrap();

        assert_eq!(manager.restore(&token).await.unwrap(), SessionState::Anonymous);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_establish_rotates_previous_slot() {
        let store = Arc::new(MemorySessionStore::new());
        let manager = manager_with(store.clone(), 3600);

        let first = manager.establish(None, &student("U1001")).await.unwrap();
        let second = manager
            .establish(Some(&first), &student("U1002"))
            .await
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(manager.restore(&first).await.unwrap(), SessionState::Anonymous);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_expired_slot_is_anonymous() {
        let manager = manager_with(Arc::new(MemorySessionStore::new()), 0);
        let token = manager.establish(None, &student("U1001")).await.unwrap();

        assert_eq!(manager.restore(&token).await.unwrap(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_abandoned_expired_slots_are_swept_on_save() {
        let store = Arc::new(MemorySessionStore::new());
        let expired = manager_with(store.clone(), 0);
        for i in 0..1000 {
            expired
                .establish(None, &student(&format!("U{}", i)))
                .await
                .unwrap();
        }

        let live = manager_with(store.clone(), 3600);
        let token = live.establish(None, &student("U1001")).await.unwrap();

        assert_eq!(store.slots.read().await.len(), 1);
        assert!(store.slots.read().await.contains_key(&token));
        assert_eq!(store.len().await, 1);
    }

    #[test]
    fn test_token_from_cookie_header() {
        let manager = manager_with(Arc::new(MemorySessionStore::new()), 3600);
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; hall_session=abc123; other=1"),
        );

        assert_eq!(manager.token_from_headers(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_missing_or_empty_cookie_has_no_token() {
        let manager = manager_with(Arc::new(MemorySessionStore::new()), 3600);
        assert!(manager.token_from_headers(&HeaderMap::new()).is_none());

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("hall_session="));
        assert!(manager.token_from_headers(&headers).is_none());
    }

    #[test]
    fn test_cookie_attributes() {
        let manager = manager_with(Arc::new(MemorySessionStore::new()), 60);
        let cookie = manager.cookie("abc").unwrap();
        assert_eq!(
            cookie.to_str().unwrap(),
            "hall_session=abc; Path=/; HttpOnly; SameSite=Lax; Max-Age=60"
        );

        let secure = SessionManager::new(
            Arc::new(MemorySessionStore::new()),
            &SessionConfig {
                cookie_secure: true,
                ..SessionConfig::default()
            },
        );
        assert!(secure.clear_cookie().unwrap().to_str().unwrap().ends_with("; Secure"));
    }
}
