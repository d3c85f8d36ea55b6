//! SQLite database implementation for Quill
//!
//! This crate provides the [`Database`] struct which implements the store
//! traits from `quill-core`, backed by SQLite.
//!
//! # Usage
//!
//! At startup the server calls [`Database::connect_with_retry`], which keeps
//! trying with exponential backoff until the retry window runs out, then
//! installs the result into a `quill_core::DatabaseHandle`. CLI commands that
//! need the database right away use [`Database::connect_to`].

mod repositories;

pub use repositories::SqliteCommentTransaction;

use quill_core::{schema, Error, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

pub const DEFAULT_DB_URL: &str = "sqlite://quill.db";

/// Connection settings for the pool
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    /// Upper bound on concurrently open connections
    pub max_connections: u32,
    /// Time allowed for a single connection attempt
    pub connect_timeout: Duration,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_DB_URL.to_string(),
            max_connections: 10,
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl DatabaseSettings {
    fn connect_options(&self) -> Result<SqliteConnectOptions> {
        let options = SqliteConnectOptions::from_str(&self.url)
            .map_err(Error::Database)?
            .create_if_missing(true);
        Ok(options)
    }
}

/// Backoff used while waiting for the database at startup
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// Total time after which startup gives up
    pub max_elapsed: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            max_elapsed: Duration::from_secs(15 * 60),
        }
    }
}

impl RetryPolicy {
    /// Delay following `current`, doubling up to `max_delay`
    pub fn next_delay(&self, current: Duration) -> Duration {
        current.saturating_mul(2).min(self.max_delay)
    }
}

/// SQLite database connection and store implementation
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to a specific database file (or `:memory:`) with default settings
    pub async fn connect_to(path: &str) -> Result<Self> {
        Self::connect_with(&DatabaseSettings {
            url: path.to_string(),
            ..Default::default()
        })
        .await
    }

    /// Make a single connection attempt
    pub async fn connect_with(settings: &DatabaseSettings) -> Result<Self> {
        let options = settings.connect_options()?;

        let connect = SqlitePoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.connect_timeout)
            .connect_with(options);

        let pool = tokio::time::timeout(settings.connect_timeout, connect)
            .await
            .map_err(|_| Error::Database(sqlx::Error::PoolTimedOut))??;

        Ok(Self { pool })
    }

    /// Connect, retrying with exponential backoff until `policy.max_elapsed`
    ///
    /// A malformed URL fails immediately; everything else is retried.
    pub async fn connect_with_retry(
        settings: &DatabaseSettings,
        policy: &RetryPolicy,
    ) -> Result<Self> {
        settings.connect_options()?;

        let started = Instant::now();
        let mut delay = policy.initial_delay;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            match Self::connect_with(settings).await {
                Ok(db) => {
                    info!(attempt, "connected to database");
                    return Ok(db);
                }
                Err(err) => {
                    if started.elapsed() + delay > policy.max_elapsed {
                        error!(attempt, error = %err, "giving up connecting to the database");
                        return Err(err);
                    }
                    warn!(
                        attempt,
                        error = %err,
                        retry_in_ms = delay.as_millis() as u64,
                        "failed to connect to the database"
                    );
                    tokio::time::sleep(delay).await;
                    delay = policy.next_delay(delay);
                }
            }
        }
    }

    /// Check whether a file-backed database already exists
    pub fn exists(url: &str) -> bool {
        let path = url
            .trim_start_matches("sqlite://")
            .trim_start_matches("sqlite:");
        let path = path.split('?').next().unwrap_or(path);
        Path::new(path).exists()
    }

    /// Initialize the database schema
    pub async fn init_schema(&self) -> Result<()> {
        schema::init_schema(&self.pool).await?;
        Ok(())
    }

    /// Get a reference to the underlying connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close all pooled connections
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
