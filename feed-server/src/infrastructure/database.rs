use std::time::Duration;

use sqlx::migrate::MigrateError;
use sqlx::{PgPool, postgres::PgPoolOptions};
use thiserror::Error;
use tracing::info;

const MAX_CONNECTIONS: u32 = 20;
const MIN_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("failed to apply migrations: {0}")]
    Migrate(#[from] MigrateError),
}

pub async fn connect(database_url: &str) -> Result<PgPool, DatabaseError> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .min_connections(MIN_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await
        .map_err(DatabaseError::Connect)?;
    info!(max_connections = MAX_CONNECTIONS, "connected to PostgreSQL");
    Ok(pool)
}

/// Applies the bundled migrations; already-applied ones are skipped.
pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
    let migrator = sqlx::migrate!();
    info!(known = migrator.iter().count(), "applying database migrations");
    migrator.run(pool).await?;
    Ok(())
}
