//! Time-bounded in-memory cache keyed by string.
//!
//! Entries carry their insertion timestamp. A read that finds an entry older than the TTL
//! evicts it and reports a miss; there is no background sweeper. Read, expiry check and
//! eviction happen under one lock acquisition.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};

/// Upper bound for configured TTLs (roughly 100 years), keeps `Duration` arithmetic in range.
pub const MAX_TTL_SECS: u64 = 100 * 365 * 24 * 60 * 60;

/// Source of "now" for expiry checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to. Used to exercise expiry deterministically.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: DateTime<Utc>,
}

pub struct TtlCache<V> {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    /// `ttl` keeps its sub-second precision; values beyond [MAX_TTL_SECS] are clamped.
    pub fn new(ttl: StdDuration, clock: Arc<dyn Clock>) -> Self {
        let max_ttl = Duration::seconds(MAX_TTL_SECS as i64);
        let ttl = Duration::from_std(ttl).map_or(max_ttl, |ttl| ttl.min(max_ttl));
        Self {
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns a clone of the live value for `key`. An entry aged strictly more than
    /// the TTL is removed and treated as absent.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.lock();
        let expired = match entries.get(key) {
            None => return None,
            Some(entry) => now - entry.inserted_at > self.ttl,
        };
        if expired {
            entries.remove(key);
            tracing::debug!(key, "cache entry expired");
            return None;
        }
        entries.get(key).map(|entry| entry.value.clone())
    }

    /// Stores `value` stamped with the current time, replacing any previous entry.
    pub fn insert(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        let inserted_at = self.clock.now();
        tracing::debug!(key = %key, "cache store");
        self.lock().insert(key, CacheEntry { value, inserted_at });
    }

    pub fn invalidate(&self, key: &str) -> bool {
        self.lock().remove(key).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of stored entries, including expired ones not yet read.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Entries are plain values; a panic elsewhere cannot leave one half-written.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .expect("valid start time")
    }

    #[test]
    fn entry_is_live_up_to_and_including_ttl() {
        let clock = Arc::new(ManualClock::new(start()));
        let cache = TtlCache::new(StdDuration::from_secs(60), clock.clone());
        cache.insert("k", 7);

        clock.advance(Duration::seconds(60));
        assert_eq!(cache.get("k"), Some(7));
    }

    #[test]
    fn entry_past_ttl_is_evicted_on_read() {
        let clock = Arc::new(ManualClock::new(start()));
        let cache = TtlCache::new(StdDuration::from_secs(60), clock.clone());
        cache.insert("k", 7);

        clock.advance(Duration::seconds(60) + Duration::milliseconds(1));
        assert_eq!(cache.len(), 1, "eviction is lazy");
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn reinsert_restarts_the_ttl_window() {
        let clock = Arc::new(ManualClock::new(start()));
        let cache = TtlCache::new(StdDuration::from_secs(10), clock.clone());
        cache.insert("k", "old");
        clock.advance(Duration::seconds(8));
        cache.insert("k", "new");
        clock.advance(Duration::seconds(8));

        assert_eq!(cache.get("k"), Some("new"));
    }

    #[test]
    fn sub_second_ttl_is_kept() {
        let clock = Arc::new(ManualClock::new(start()));
        let cache = TtlCache::new(StdDuration::from_millis(500), clock.clone());
        cache.insert("k", 7);

        clock.advance(Duration::milliseconds(400));
        assert_eq!(cache.get("k"), Some(7));

        clock.advance(Duration::milliseconds(200));
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn oversized_ttl_is_clamped() {
        let clock = Arc::new(ManualClock::new(start()));
        let cache = TtlCache::new(StdDuration::MAX, clock.clone());
        cache.insert("k", 7);

        clock.advance(Duration::days(365));
        assert_eq!(cache.get("k"), Some(7));
    }

    #[test]
    fn invalidate_and_clear_remove_entries() {
        let cache = TtlCache::new(StdDuration::from_secs(60), Arc::new(SystemClock));
        cache.insert("a", 1);
        cache.insert("b", 2);

        assert!(cache.invalidate("a"));
        assert!(!cache.invalidate("a"));
        assert_eq!(cache.get("b"), Some(2));

        cache.clear();
        assert!(cache.is_empty());
    }
}
