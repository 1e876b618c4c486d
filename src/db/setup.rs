use std::time::{Duration, Instant};

use rusqlite::Connection;

use super::migrations::run_migrations;
use crate::error::{AppError, AppResult};

pub fn init_db(path: &str) -> Result<Connection, rusqlite::Error> {
    let conn = Connection::open(path)?;

    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA cache_size = -64000;
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = 5000;
        PRAGMA temp_store = MEMORY;
    ",
    )?;

    run_migrations(&conn)?;

    Ok(conn)
}

/// In-memory database with the full schema. Used by tests and demo
/// embeddings; shares the migration path with [`init_db`].
pub fn init_memory_db() -> Result<Connection, rusqlite::Error> {
    let conn = Connection::open_in_memory()?;
    run_migrations(&conn)?;
    Ok(conn)
}

/// Runs `f` under a statement watchdog: a progress handler interrupts any
/// statement still executing once `timeout` has elapsed, which surfaces as
/// [`AppError::QueryTimeout`]. The handler is removed before returning.
pub fn with_query_timeout<T, F>(conn: &Connection, timeout: Duration, f: F) -> AppResult<T>
where
    F: FnOnce(&Connection) -> AppResult<T>,
{
    let deadline = Instant::now() + timeout;
    conn.progress_handler(1000, Some(move || Instant::now() >= deadline));

    let result = f(conn);

    conn.progress_handler(0, None::<fn() -> bool>);

    match result {
        Err(AppError::QueryTimeout(_)) => Err(AppError::QueryTimeout(timeout.as_millis() as u64)),
        other => other,
    }
}
