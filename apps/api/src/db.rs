use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

const ACQUIRE_TIMEOUT_SECS: u64 = 5;

/// Opens the SkillMatrix Postgres pool. The catalog is read-only, so no migrations run here.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    info!("Connecting to the SkillMatrix database...");

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(ACQUIRE_TIMEOUT_SECS))
        .connect(database_url)
        .await
        .context("could not connect to DATABASE_URL")?;

    info!("Database pool established (max_connections={max_connections})");
    Ok(pool)
}
