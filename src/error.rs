use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Connectivity, SQL, schema or timeout failure talking to the store.
    /// Recovered at the view composer boundary: the affected section renders
    /// an empty state, siblings are untouched.
    #[error("data source error: {0}")]
    DataSource(String),

    #[error("query exceeded the {0} ms timeout")]
    QueryTimeout(u64),

    /// A customer/entity search matched nothing. User-visible "not found",
    /// never a crash.
    #[error("no match found for '{0}'")]
    LookupNotFound(String),

    #[error("database not initialized")]
    DatabaseNotInitialized,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        // SQLITE_INTERRUPT is what the query watchdog raises; keep the
        // timeout identity rather than folding it into a generic SQL error.
        if let rusqlite::Error::SqliteFailure(err, _) = &e {
            if err.code == rusqlite::ErrorCode::OperationInterrupted {
                return AppError::QueryTimeout(0);
            }
        }
        AppError::DataSource(e.to_string())
    }
}

impl AppError {
    /// True for failures the composer converts into a degraded section
    /// instead of propagating.
    pub fn is_data_source(&self) -> bool {
        matches!(
            self,
            AppError::DataSource(_) | AppError::QueryTimeout(_) | AppError::DatabaseNotInitialized
        )
    }
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
