//! Database pool initialization.
//!
//! The pool is created lazily: no connection is opened until the first
//! request, so the service comes up even when the store is down and reports
//! "No DB connection" per request instead.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::ServiceConfig;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum DbInitError {
    #[error("DATABASE_URL is not set")]
    NotConfigured,
    #[error("invalid DATABASE_URL: {0}")]
    InvalidUrl(#[from] sqlx::Error),
}

/// Build the lazy PostgreSQL pool described by `config`.
///
/// # Errors
///
/// Returns [`DbInitError`] when no URL is configured or it cannot be parsed.
pub fn init_pool(config: &ServiceConfig) -> Result<PgPool, DbInitError> {
    let url = config.database_url.as_deref().ok_or(DbInitError::NotConfigured)?;
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_lazy(url)?;
    Ok(pool)
}
