use crate::config::DatabaseConfig;
#[cfg(feature = "db-postgres")]
use crate::error::Context;
use crate::error::Result;
use std::time::Duration;

#[cfg(feature = "db-postgres")]
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
#[cfg(feature = "db-postgres")]
use sqlx::{ConnectOptions, PgPool};
#[cfg(feature = "db-postgres")]
use std::str::FromStr;
#[cfg(feature = "db-postgres")]
use std::time::Instant;

#[cfg(feature = "db-postgres")]
const SCHEMA_SQL: &str = include_str!("../../migrations/0001_init.sql");

/// Shared Postgres pool serving the document and chat tables.
#[cfg(feature = "db-postgres")]
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

#[cfg(not(feature = "db-postgres"))]
#[derive(Clone)]
pub struct Database;

#[cfg(feature = "db-postgres")]
impl Database {
    /// Builds the pool without opening a connection; the first checkout connects.
    pub fn connect_lazy(config: &DatabaseConfig, log_statements: bool) -> Result<Self> {
        let mut options = PgConnectOptions::from_str(&config.url)
            .context("invalid database connection string")?;
        if !log_statements {
            options = options.disable_statement_logging();
        }

        let pool = PgPoolOptions::new()
            .min_connections(0)
            .max_connections(config.max_connections())
            .acquire_timeout(config.acquire_timeout())
            .connect_lazy_with(options);

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Checks out one connection, then times a `SELECT 1` on it. The checkout is not
    /// part of the returned duration; the connection goes back to the pool on drop.
    pub async fn round_trip(&self) -> Result<Duration> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .context("failed to acquire database connection")?;

        let started = Instant::now();
        sqlx::query("SELECT 1")
            .execute(&mut *conn)
            .await
            .context("database round trip failed")?;
        Ok(started.elapsed())
    }

    pub async fn init_schema(&self) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("failed to open schema transaction")?;
        sqlx::raw_sql(SCHEMA_SQL)
            .execute(&mut *tx)
            .await
            .context("failed to create database schema")?;
        tx.commit().await.context("failed to commit database schema")?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(not(feature = "db-postgres"))]
impl Database {
    pub fn connect_lazy(_config: &DatabaseConfig, _log_statements: bool) -> Result<Self> {
        Ok(Self)
    }

    pub async fn round_trip(&self) -> Result<Duration> {
        Err(crate::err!(
            "database support requires the `db-postgres` feature at compile time"
        ))
    }

    pub async fn init_schema(&self) -> Result<()> {
        Err(crate::err!(
            "database support requires the `db-postgres` feature at compile time"
        ))
    }

    pub async fn close(&self) {}
}
