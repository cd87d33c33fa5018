/// In-memory TTL cache
///
/// A plain key → value map where every entry remembers when it was inserted.
/// Expired entries are not swept in the background; they are dropped the next
/// time someone asks for them.
///
/// The cache is not synchronized. Methods take `&mut self`, so sharing it
/// across requests requires an outer lock (the API server keeps it behind a
/// `Mutex` in its application state).
///
/// # Expiry
///
/// An entry is live while `now - inserted_at < ttl`. Once the TTL has fully
/// elapsed, `get` removes it and returns `None`; later lookups keep returning
/// `None` until the key is `set` again.
///
/// # Example
///
/// ```
/// use coronablog_shared::cache::TtlCache;
///
/// let mut cache: TtlCache<String> = TtlCache::default();
/// cache.set("corona_news", "[]".to_string(), None);
/// assert_eq!(cache.get("corona_news").as_deref(), Some("[]"));
/// ```

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::clock::{Clock, SystemClock};

/// Default time-to-live for cached entries (5 minutes)
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: DateTime<Utc>,
    ttl: Duration,
}

/// Unbounded cache with lazy per-entry expiry
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: HashMap<String, CacheEntry<V>>,
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> TtlCache<V> {
    /// Creates a cache backed by the system clock
    pub fn new(default_ttl: Duration) -> Self {
        Self::with_clock(default_ttl, Arc::new(SystemClock))
    }

    /// Creates a cache that reads time from `clock`
    pub fn with_clock(default_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            default_ttl,
            clock,
        }
    }

    /// Returns the cached value, evicting it first if its TTL has elapsed
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let expired = match self.entries.get(key) {
            Some(entry) => {
                // A clock that moved backwards counts as zero elapsed time.
                let elapsed = (now - entry.inserted_at).to_std().unwrap_or(Duration::ZERO);
                elapsed >= entry.ttl
            }
            None => return None,
        };

        if expired {
            debug!(key, "Cache entry expired");
            self.entries.remove(key);
            return None;
        }

        self.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Stores `value` under `key`, replacing any previous entry
    ///
    /// `ttl` overrides the cache default for this entry only.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let entry = CacheEntry {
            value,
            inserted_at: self.clock.now(),
            ttl: ttl.unwrap_or(self.default_ttl),
        };
        self.entries.insert(key.into(), entry);
    }

    /// Removes every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of stored entries, including expired ones not yet looked up
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The TTL applied when `set` is called without an override
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
