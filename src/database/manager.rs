use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

use crate::config;

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Process-wide connection pool manager for the storefront database
pub struct DatabaseManager {
    pool: Arc<RwLock<Option<PgPool>>>,
}

impl DatabaseManager {
    fn instance() -> &'static DatabaseManager {
        use std::sync::OnceLock;
        static INSTANCE: OnceLock<DatabaseManager> = OnceLock::new();
        INSTANCE.get_or_init(|| DatabaseManager {
            pool: Arc::new(RwLock::new(None)),
        })
    }

    /// Get the shared database pool, connecting lazily on first use
    pub async fn pool() -> Result<PgPool, DatabaseError> {
        Self::instance().get_pool().await
    }

    async fn get_pool(&self) -> Result<PgPool, DatabaseError> {
        // Fast path: try read lock
        {
            let pool = self.pool.read().await;
            if let Some(pool) = pool.as_ref() {
                return Ok(pool.clone());
            }
        }

        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| DatabaseError::ConfigMissing("DATABASE_URL"))?;

        let db_config = &config::config().database;
        let pool = PgPoolOptions::new()
            .max_connections(db_config.max_connections)
            .acquire_timeout(Duration::from_secs(db_config.connection_timeout))
            .connect(&database_url)
            .await?;

        {
            let mut slot = self.pool.write().await;
            *slot = Some(pool.clone());
        }

        info!("Created database pool");
        Ok(pool)
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check() -> Result<(), DatabaseError> {
        let pool = Self::pool().await?;
        sqlx::query("SELECT 1").execute(&pool).await?;
        Ok(())
    }

    /// Apply pending schema migrations from ./migrations
    pub async fn migrate() -> Result<(), DatabaseError> {
        let pool = Self::pool().await?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Close the pool (e.g., on shutdown)
    pub async fn close() {
        let manager = Self::instance();
        let mut slot = manager.pool.write().await;
        if let Some(pool) = slot.take() {
            pool.close().await;
            info!("Closed database pool");
        }
    }
}
