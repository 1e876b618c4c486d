use rusqlite::Connection;
use serde::{Deserialize, Serialize};

/// Tunable dashboard settings, persisted in the `config` key-value table.
/// Every field has a code-side default; rows in the table override.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// TTL in seconds for most cached query results.
    pub cache_ttl_secs: u64,
    /// Shorter TTL for entity-lookup queries reflecting "current state".
    pub lookup_ttl_secs: u64,
    /// Statement watchdog budget per query batch, in milliseconds.
    pub query_timeout_ms: u64,
    /// Seed for the bounded jitter applied to risk/performance rankings.
    pub scoring_seed: u64,
    /// Row cap for the complaint detail table.
    pub detail_row_limit: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            cache_ttl_secs: 300,
            lookup_ttl_secs: 60,
            query_timeout_ms: 10_000,
            scoring_seed: 7,
            detail_row_limit: 1000,
        }
    }
}

pub fn get_config_from_db(conn: &Connection) -> Result<AppConfig, rusqlite::Error> {
    let mut stmt = conn.prepare_cached("SELECT key, value FROM config")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut config = AppConfig::default();

    for row in rows {
        let (key, value) = row?;
        match key.as_str() {
            "cache_ttl_secs" => config.cache_ttl_secs = value.parse().unwrap_or(300),
            "lookup_ttl_secs" => config.lookup_ttl_secs = value.parse().unwrap_or(60),
            "query_timeout_ms" => config.query_timeout_ms = value.parse().unwrap_or(10_000),
            "scoring_seed" => config.scoring_seed = value.parse().unwrap_or(7),
            "detail_row_limit" => config.detail_row_limit = value.parse().unwrap_or(1000),
            _ => {}
        }
    }

    Ok(config)
}

pub fn update_config_in_db(conn: &Connection, config: &AppConfig) -> Result<(), rusqlite::Error> {
    let pairs: Vec<(&str, String)> = vec![
        ("cache_ttl_secs", config.cache_ttl_secs.to_string()),
        ("lookup_ttl_secs", config.lookup_ttl_secs.to_string()),
        ("query_timeout_ms", config.query_timeout_ms.to_string()),
        ("scoring_seed", config.scoring_seed.to_string()),
        ("detail_row_limit", config.detail_row_limit.to_string()),
    ];

    let mut stmt = conn.prepare_cached(
        "INSERT OR REPLACE INTO config (key, value, updated_at) VALUES (?1, ?2, datetime('now'))",
    )?;

    for (key, value) in pairs {
        stmt.execute(rusqlite::params![key, value])?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::setup::init_memory_db;

    #[test]
    fn test_defaults_when_table_empty() {
        let conn = init_memory_db().unwrap();
        let config = get_config_from_db(&conn).unwrap();
        assert_eq!(config.cache_ttl_secs, 300);
        assert_eq!(config.lookup_ttl_secs, 60);
    }

    #[test]
    fn test_roundtrip_overrides() {
        let conn = init_memory_db().unwrap();
        let mut config = AppConfig::default();
        config.cache_ttl_secs = 120;
        config.scoring_seed = 42;
        update_config_in_db(&conn, &config).unwrap();

        let loaded = get_config_from_db(&conn).unwrap();
        assert_eq!(loaded.cache_ttl_secs, 120);
        assert_eq!(loaded.scoring_seed, 42);
        assert_eq!(loaded.query_timeout_ms, 10_000);
    }

    #[test]
    fn test_garbage_value_falls_back() {
        let conn = init_memory_db().unwrap();
        conn.execute(
            "INSERT INTO config (key, value) VALUES ('cache_ttl_secs', 'not-a-number')",
            [],
        )
        .unwrap();
        let config = get_config_from_db(&conn).unwrap();
        assert_eq!(config.cache_ttl_secs, 300);
    }
}
