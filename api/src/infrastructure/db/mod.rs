use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use tokio::task::JoinHandle;

use crate::application::ports::health_probe::HealthProbe;

pub type PgPool = Pool<Postgres>;

/// Builds the pool without opening a connection, so the API can start while
/// the database is still unreachable. `/health` reports the outage.
pub fn lazy_pool(database_url: &str, acquire_timeout: Duration) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(acquire_timeout)
        .connect_lazy(database_url)?;
    Ok(pool)
}

pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    // Uses compile-time embedded migrations under ./migrations
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Checks connectivity, then applies pending migrations.
pub async fn prepare(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await?;
    migrate(pool).await
}

/// Retries [`prepare`] in the background until it succeeds.
pub fn retry_prepare(pool: PgPool, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut attempt: u32 = 1;
        loop {
            tokio::time::sleep(every).await;
            attempt += 1;
            match prepare(&pool).await {
                Ok(()) => {
                    tracing::info!(attempt, "database_connection_ok");
                    return;
                }
                Err(e) => tracing::warn!(attempt, error = ?e, "database_connection_retry_failed"),
            }
        }
    })
}

pub struct PgHealthProbe {
    pub pool: PgPool,
}

impl PgHealthProbe {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthProbe for PgHealthProbe {
    async fn ping(&self) -> anyhow::Result<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}

pub mod repositories;
