// --- File: crates/studylink_db/src/error.rs ---
use thiserror::Error;

/// Errors produced by the persistence store.
#[derive(Error, Debug)]
pub enum DbError {
    /// The store configuration is missing or unusable.
    #[error("Database configuration error: {0}")]
    ConfigError(String),

    /// The database URL is missing or malformed.
    #[error("Database URL error: {0}")]
    UrlError(String),

    /// The connection pool could not be created or a connection failed.
    /// Transient: callers may retry with backoff.
    #[error("Database pool error: {0}")]
    PoolError(String),

    /// A store call did not complete within the bounded timeout.
    /// Transient: callers may retry with backoff.
    #[error("Database timeout: {0}")]
    Timeout(String),

    /// A query failed to execute or a row failed to decode.
    #[error("Database query error: {0}")]
    QueryError(String),
}

impl DbError {
    /// Whether a retry at the calling layer is reasonable. Request
    /// handlers still surface these as 5xx without retrying inline; the
    /// reminder scheduler simply lets the next tick retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, DbError::PoolError(_) | DbError::Timeout(_))
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => DbError::Timeout("pool acquire timed out".to_string()),
            sqlx::Error::PoolClosed => DbError::PoolError("pool closed".to_string()),
            sqlx::Error::Io(e) => DbError::PoolError(e.to_string()),
            other => DbError::QueryError(other.to_string()),
        }
    }
}
