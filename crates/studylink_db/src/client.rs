// --- File: crates/studylink_db/src/client.rs ---
//! Database client for StudyLink.
//!
//! Database agnostic via SQLx's `Any` driver; SQLite is the default
//! backend. All query modules hang off [`Store`].

use crate::error::DbError;
use crate::schema;
use sqlx::pool::PoolOptions;
use sqlx::{Any, Pool};
use std::str::FromStr;
use std::time::Duration;
use studylink_config::DatabaseConfig;
use tracing::{debug, error, info};

/// Handle to the persistence store.
#[derive(Debug, Clone)]
pub struct Store {
    pool: Pool<Any>,
}

impl Store {
    /// Connect using the application's database configuration.
    pub async fn connect(db_config: &DatabaseConfig) -> Result<Self, DbError> {
        if db_config.url.is_empty() {
            return Err(DbError::ConfigError("Database URL is empty".to_string()));
        }
        Self::from_url(&db_config.url).await
    }

    /// Connect from a raw database URL.
    pub async fn from_url(db_url: &str) -> Result<Self, DbError> {
        if db_url.is_empty() {
            return Err(DbError::UrlError("Database URL is empty".to_string()));
        }
        let pool = Self::create_pool(db_url).await?;
        Ok(Self { pool })
    }

    async fn create_pool(db_url: &str) -> Result<Pool<Any>, DbError> {
        debug!("Creating database pool with URL: {}", db_url);

        // Register the compiled-in drivers with the Any driver.
        sqlx::any::install_default_drivers();

        // An in-memory SQLite database exists per connection; a pool of
        // more than one would hand out connections that cannot see the
        // migrated schema.
        let max_connections = if db_url.contains(":memory:") { 1 } else { 5 };

        let pool_options = PoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .idle_timeout(Duration::from_secs(600));

        // Acquisition is bounded above; statement execution gets a
        // server-side bound where the backend supports one. SQLite
        // executes in-process and has no statement timeout to set.
        let pool_options = match statement_timeout_setup(db_url) {
            Some(setup) => pool_options.after_connect(move |conn, _meta| {
                Box::pin(async move { sqlx::query(setup).execute(conn).await.map(|_| ()) })
            }),
            None => pool_options,
        };

        // For file-backed SQLite, make sure the parent directory and the
        // database file exist before the driver opens it.
        if db_url.starts_with("sqlite:") {
            let db_path = db_url
                .strip_prefix("sqlite://")
                .or_else(|| db_url.strip_prefix("sqlite:"))
                .unwrap_or(db_url);
            if !db_path.contains(":memory:") && !db_path.is_empty() {
                if let Some(dir) = std::path::Path::new(db_path).parent() {
                    if !dir.as_os_str().is_empty() && !dir.exists() {
                        debug!("Creating directory for SQLite database: {:?}", dir);
                        std::fs::create_dir_all(dir).map_err(|e| {
                            DbError::PoolError(format!("Failed to create directory: {}", e))
                        })?;
                    }
                }
                if !std::path::Path::new(db_path).exists() {
                    debug!("Creating empty SQLite database file: {}", db_path);
                    std::fs::File::create(db_path).map_err(|e| {
                        DbError::PoolError(format!("Failed to create database file: {}", e))
                    })?;
                }
            }
        }

        let pool = pool_options
            .connect_with(sqlx::any::AnyConnectOptions::from_str(db_url)?)
            .await
            .map_err(|e| {
                error!("Failed to create database pool: {}", e);
                DbError::PoolError(e.to_string())
            })?;

        info!("Database pool created successfully");
        Ok(pool)
    }

    /// The underlying connection pool.
    pub fn pool(&self) -> &Pool<Any> {
        &self.pool
    }

    /// Create the schema if it does not exist yet. Idempotent; run at startup.
    pub async fn migrate(&self) -> Result<(), DbError> {
        for statement in schema::STATEMENTS {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("Database schema is up to date");
        Ok(())
    }

    /// Check store health by executing a trivial query.
    pub async fn is_healthy(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

/// Per-session setup statement bounding query execution time, for
/// backends that enforce one server-side.
fn statement_timeout_setup(db_url: &str) -> Option<&'static str> {
    if db_url.starts_with("postgres:") || db_url.starts_with("postgresql:") {
        Some("SET statement_timeout = '5s'")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statement_timeout_is_set_for_server_backends_only() {
        assert!(statement_timeout_setup("postgres://localhost/studylink").is_some());
        assert!(statement_timeout_setup("postgresql://localhost/studylink").is_some());
        assert!(statement_timeout_setup("sqlite::memory:").is_none());
        assert!(statement_timeout_setup("sqlite:data/studylink.db").is_none());
    }
}
