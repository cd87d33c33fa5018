/// Server-side login sessions
///
/// A session is created when an account logs in and destroyed at logout. The
/// client only ever holds an opaque random token; the store keeps the SHA-256
/// of that token, so a leaked session map does not leak usable credentials.
///
/// # Lifecycle
///
/// ```text
/// login ──create()──> token ──get()──> Session ──destroy()──> gone
///                              │
///                              └─ expired? removed on lookup
/// ```
///
/// # Example
///
/// ```
/// use coronablog_shared::auth::session::SessionStore;
/// use coronablog_shared::auth::policy::AccountStatus;
/// use std::time::Duration;
///
/// let store = SessionStore::new(Duration::from_secs(7200));
/// let (token, session) = store.create(1, "alice", AccountStatus::Active);
/// assert_eq!(store.get(&token).unwrap().handle, session.handle);
///
/// store.destroy(&token);
/// assert!(store.get(&token).is_none());
/// ```

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::debug;

use super::policy::AccountStatus;
use crate::clock::{Clock, SystemClock};

/// Default session lifetime (2 hours)
pub const DEFAULT_SESSION_LIFETIME: Duration = Duration::from_secs(2 * 60 * 60);

/// Length of a session token (characters)
pub const SESSION_TOKEN_LENGTH: usize = 48;

/// Per-client login state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub logged_in: bool,

    /// Handle of the logged-in account
    pub handle: String,

    /// Account status captured at login (kept in sync by status changes)
    pub status: AccountStatus,

    pub account_id: i64,

    pub expires_at: DateTime<Utc>,
}

/// In-memory session table keyed by token hash
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    lifetime: Duration,
    clock: Arc<dyn Clock>,
}

impl SessionStore {
    pub fn new(lifetime: Duration) -> Self {
        Self::with_clock(lifetime, Arc::new(SystemClock))
    }

    pub fn with_clock(lifetime: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            lifetime,
            clock,
        }
    }

    /// Opens a session and returns the plaintext token the client must present
    pub fn create(&self, account_id: i64, handle: &str, status: AccountStatus) -> (String, Session) {
        let token = generate_session_token();
        let session = Session {
            logged_in: true,
            handle: handle.to_string(),
            status,
            account_id,
            expires_at: self.expiry_from(self.clock.now()),
        };

        self.write().insert(hash_session_token(&token), session.clone());
        debug!(account_id, handle, "Session created");

        (token, session)
    }

    /// Expiry for a session opened at `now`, saturating at the latest
    /// representable instant
    fn expiry_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        chrono::Duration::from_std(self.lifetime)
            .ok()
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Resolves a token, dropping the session if it has expired
    pub fn get(&self, token: &str) -> Option<Session> {
        let key = hash_session_token(token);
        let now = self.clock.now();

        let session = self.read().get(&key).cloned()?;
        if session.expires_at <= now {
            self.write().remove(&key);
            debug!(handle = %session.handle, "Session expired");
            return None;
        }

        Some(session)
    }

    /// Ends a session; returns whether one existed
    pub fn destroy(&self, token: &str) -> bool {
        self.write().remove(&hash_session_token(token)).is_some()
    }

    /// Rewrites the status of every live session belonging to `account_id`
    ///
    /// Called after an admin changes an account's status so that guards see
    /// the new status without waiting for a fresh login.
    pub fn update_status(&self, account_id: i64, status: AccountStatus) -> usize {
        let mut sessions = self.write();
        let mut updated = 0;
        for session in sessions.values_mut().filter(|s| s.account_id == account_id) {
            session.status = status;
            updated += 1;
        }
        updated
    }

    /// Removes every expired session; returns how many were dropped
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut sessions = self.write();
        let before = sessions.len();
        sessions.retain(|_, session| session.expires_at > now);
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Session>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Session>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_LIFETIME)
    }
}

/// Generates a random alphanumeric session token
pub fn generate_session_token() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    (0..SESSION_TOKEN_LENGTH)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

/// Hex-encoded SHA-256 of a token
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
