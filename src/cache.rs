//! Time-boxed memoization of query results.
//!
//! Keys are structural: a static query name plus normalized parameter
//! strings, never SQL text. Entries are published whole (compute outside
//! the lock, insert after) and replaced atomically; a caller can observe an
//! old entry or a new one, never a partially written one. Two callers
//! racing on a cold key may both run the producer; that is accepted because
//! producers are side-effect-free reads.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::db::result::QueryResult;
use crate::error::AppResult;

/// Time source injected into the cache so tests can drive expiry with a
/// deterministic clock.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Structural cache key: query identity + normalized parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub query: &'static str,
    pub params: Vec<String>,
}

impl QueryKey {
    pub fn new(query: &'static str, params: Vec<String>) -> Self {
        QueryKey { query, params }
    }

    pub fn ranged(query: &'static str, range: &crate::model::DateRange) -> Self {
        QueryKey::new(
            query,
            vec![range.start_date_param(), range.end_date_param()],
        )
    }
}

struct CacheEntry {
    result: Arc<QueryResult>,
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Defensive structural check: every row must match the column arity.
    /// A failing entry is treated as a miss, never surfaced as an error.
    fn is_well_formed(&self) -> bool {
        let width = self.result.columns.len();
        self.result.rows.iter().all(|r| r.len() == width)
    }
}

pub struct ResultCache {
    entries: Mutex<HashMap<QueryKey, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl ResultCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        ResultCache {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Returns the live entry for `key`, or runs `producer`, stores its
    /// output with `now + ttl`, and returns it. Producer errors are
    /// returned as-is and never cached.
    pub fn get_or_compute<F>(
        &self,
        key: QueryKey,
        ttl: Duration,
        producer: F,
    ) -> AppResult<Arc<QueryResult>>
    where
        F: FnOnce() -> AppResult<QueryResult>,
    {
        let now = self.clock.now_utc();

        if let Some(hit) = self.lookup(&key, now) {
            return Ok(hit);
        }

        // Cold or expired: compute outside the lock, then publish.
        let result = Arc::new(producer()?);
        let expires_at = now + chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::zero());

        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.insert(
            key,
            CacheEntry {
                result: Arc::clone(&result),
                expires_at,
            },
        );

        Ok(result)
    }

    fn lookup(&self, key: &QueryKey, now: DateTime<Utc>) -> Option<Arc<QueryResult>> {
        let entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let entry = entries.get(key)?;
        if entry.expires_at <= now {
            return None;
        }
        if !entry.is_well_formed() {
            log::warn!("cache entry for '{}' is malformed, recomputing", key.query);
            return None;
        }
        Some(Arc::clone(&entry.result))
    }

    /// Drops every entry immediately. Backs the manual refresh action.
    pub fn clear_all(&self) {
        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.clear();
    }

    pub fn len(&self) -> usize {
        match self.entries.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::result::Scalar;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Manually advanced clock for deterministic TTL tests.
    struct TestClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl TestClock {
        fn new() -> Arc<Self> {
            Arc::new(TestClock {
                now: Mutex::new("2025-06-01T12:00:00Z".parse().unwrap()),
            })
        }

        fn advance(&self, secs: i64) {
            let mut now = self.now.lock().unwrap();
            *now += chrono::Duration::seconds(secs);
        }
    }

    impl Clock for TestClock {
        fn now_utc(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }

    fn sample_result() -> QueryResult {
        QueryResult {
            columns: vec!["count".into()],
            rows: vec![vec![Scalar::Integer(3)]],
        }
    }

    fn key() -> QueryKey {
        QueryKey::new("channel_distribution", vec!["2025-01-01".into(), "2025-03-31".into()])
    }

    #[test]
    fn test_hit_within_ttl_skips_producer() {
        let clock = TestClock::new();
        let cache = ResultCache::new(clock.clone());
        let calls = AtomicU32::new(0);

        for _ in 0..3 {
            let qr = cache
                .get_or_compute(key(), Duration::from_secs(300), || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(sample_result())
                })
                .unwrap();
            assert_eq!(qr.scalar_i64("count"), 3);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_expiry_triggers_exactly_one_recompute() {
        let clock = TestClock::new();
        let cache = ResultCache::new(clock.clone());
        let calls = AtomicU32::new(0);
        let produce = || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(sample_result())
        };

        cache.get_or_compute(key(), Duration::from_secs(300), produce).unwrap();
        clock.advance(301);
        cache.get_or_compute(key(), Duration::from_secs(300), produce).unwrap();
        cache.get_or_compute(key(), Duration::from_secs(300), produce).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_clear_all_forces_recompute() {
        let clock = TestClock::new();
        let cache = ResultCache::new(clock);
        let calls = AtomicU32::new(0);
        let produce = || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(sample_result())
        };

        cache.get_or_compute(key(), Duration::from_secs(300), produce).unwrap();
        cache.clear_all();
        assert!(cache.is_empty());
        cache.get_or_compute(key(), Duration::from_secs(300), produce).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let clock = TestClock::new();
        let cache = ResultCache::new(clock);
        let calls = AtomicU32::new(0);

        let err = cache.get_or_compute(key(), Duration::from_secs(300), || {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(crate::error::AppError::DataSource("boom".into()))
        });
        assert!(err.is_err());

        let ok = cache.get_or_compute(key(), Duration::from_secs(300), || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(sample_result())
        });
        assert!(ok.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_malformed_entry_treated_as_miss() {
        let clock = TestClock::new();
        let cache = ResultCache::new(clock.clone());

        // Publish an entry with a row wider than its column set.
        let bad = QueryResult {
            columns: vec!["a".into()],
            rows: vec![vec![Scalar::Integer(1), Scalar::Integer(2)]],
        };
        cache
            .get_or_compute(key(), Duration::from_secs(300), || Ok(bad))
            .unwrap();

        let calls = AtomicU32::new(0);
        let qr = cache
            .get_or_compute(key(), Duration::from_secs(300), || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(sample_result())
            })
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(qr.scalar_i64("count"), 3);
    }

    #[test]
    fn test_distinct_params_are_distinct_entries() {
        let clock = TestClock::new();
        let cache = ResultCache::new(clock);
        let calls = AtomicU32::new(0);
        let produce = || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(sample_result())
        };

        let other = QueryKey::new("channel_distribution", vec!["2025-04-01".into(), "2025-06-30".into()]);
        cache.get_or_compute(key(), Duration::from_secs(300), produce).unwrap();
        cache.get_or_compute(other, Duration::from_secs(300), produce).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);
    }
}
