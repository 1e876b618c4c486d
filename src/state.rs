use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::cache::{Clock, QueryKey, ResultCache, SystemClock};
use crate::config::AppConfig;
use crate::db::result::QueryResult;
use crate::db::setup::with_query_timeout;
use crate::error::{AppError, AppResult};

/// Shared application state: the database handle, the result cache and the
/// effective configuration. The connection lives behind a `Mutex<Option<_>>`
/// so the dashboard can start before a source is attached.
pub struct AppState {
    pub db: Mutex<Option<Connection>>,
    pub cache: ResultCache,
    pub config: AppConfig,
    clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(conn: Connection, config: AppConfig) -> Self {
        Self::with_clock(conn, config, Arc::new(SystemClock))
    }

    pub fn with_clock(conn: Connection, config: AppConfig, clock: Arc<dyn Clock>) -> Self {
        AppState {
            db: Mutex::new(Some(conn)),
            cache: ResultCache::new(Arc::clone(&clock)),
            config,
            clock,
        }
    }

    /// Reference instant used by every age and SLA computation on a page,
    /// so all sections of one render agree on "now".
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now_utc()
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.config.cache_ttl_secs)
    }

    pub fn lookup_ttl(&self) -> Duration {
        Duration::from_secs(self.config.lookup_ttl_secs)
    }

    /// Cache-through read: serves a live entry or runs `producer` against
    /// the database under the statement watchdog.
    pub fn cached_query<F>(
        &self,
        key: QueryKey,
        ttl: Duration,
        producer: F,
    ) -> AppResult<Arc<QueryResult>>
    where
        F: FnOnce(&Connection) -> AppResult<QueryResult>,
    {
        self.cache.get_or_compute(key, ttl, || self.db(producer))
    }
}

/// Checked access to the connection. Every data path goes through `db`,
/// which also arms the query watchdog for the duration of the closure.
pub trait DbAccess {
    fn db<T, F>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&Connection) -> AppResult<T>;
}

impl DbAccess for AppState {
    fn db<T, F>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&Connection) -> AppResult<T>,
    {
        let guard = match self.db.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let conn = guard.as_ref().ok_or(AppError::DatabaseNotInitialized)?;
        with_query_timeout(
            conn,
            Duration::from_millis(self.config.query_timeout_ms),
            f,
        )
    }
}
