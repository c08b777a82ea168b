//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. The
//! pool is optional: without one, every list request degrades to the
//! "No DB connection" response and `db_issue` says why.

use std::sync::Arc;

use sqlx::PgPool;

/// Clone is required by Axum; the pool is internally reference-counted.
#[derive(Clone)]
pub struct AppState {
    pub pool: Option<PgPool>,
    pub db_issue: Option<Arc<str>>,
}

impl AppState {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Some(pool), db_issue: None }
    }

    #[must_use]
    pub fn without_db(reason: impl Into<Arc<str>>) -> Self {
        Self { pool: None, db_issue: Some(reason.into()) }
    }
}
