use sqlx::PgPool;
use std::env;

use crate::db::{create_db_pool, DatabaseConfig};

/// Shared application state: the database pool borrowed by every request
/// handler. Handlers keep no state of their own between requests.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|e| anyhow::anyhow!("DATABASE_URL must be set: {}", e))?;

        let db_pool = create_db_pool(&database_url, DatabaseConfig::from_env()).await?;

        Ok(Self { db_pool })
    }

    /// Builds state around an existing pool so tests and embedders can
    /// point the service at an isolated database instead of the process
    /// environment.
    pub fn with_pool(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}
