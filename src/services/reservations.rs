//! Reservable-table listing over the `tables` relation.
//!
//! DESIGN
//! ======
//! Column names vary between installs (`name` vs `guest_name`, `price` vs
//! `reservation_price`, ...). Rows are therefore read whole as `to_jsonb(t)`
//! and normalized with the shared fallback chains in Rust rather than in SQL.
//! Filtering and ordering happen after normalization:
//!
//! - reserved scope keeps statuses containing `reserv` or `book`, case-insensitively;
//! - rows sort by the leading integer of the table number, then lexically.
//!
//! The service is read-only; nothing here writes to the store.

use serde_json::Value;
use sqlx::PgPool;
use sqlx::error::DatabaseError;
use tables::TableRecord;

use crate::state::AppState;

const SELECT_ALL_ROWS: &str = "SELECT to_jsonb(t) FROM tables t";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    Reserved,
    All,
}

#[derive(Debug, thiserror::Error)]
pub enum ReservationError {
    #[error("no database connection: {0}")]
    NotConfigured(String),
    #[error("database unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),
    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),
}

impl ReservationError {
    /// Whether the store could not be reached at all, as opposed to a failed query.
    #[must_use]
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::NotConfigured(_) | Self::Unavailable(_))
    }
}

impl From<sqlx::Error> for ReservationError {
    fn from(err: sqlx::Error) -> Self {
        let refused = err
            .as_database_error()
            .and_then(DatabaseError::code)
            .is_some_and(|code| is_connection_sqlstate(&code));
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Configuration(_) => Self::Unavailable(err),
            sqlx::Error::Database(_) if refused => Self::Unavailable(err),
            other => Self::Query(other),
        }
    }
}

/// SQLSTATE classes raised while connecting: `08` connection exception,
/// `28` invalid authorization, `3D` invalid catalog name.
#[must_use]
pub fn is_connection_sqlstate(code: &str) -> bool {
    ["08", "28", "3D"].iter().any(|class| code.starts_with(class))
}

/// List tables in `scope`, normalized and ordered.
///
/// # Errors
///
/// Returns [`ReservationError`] when there is no pool, the store is
/// unreachable, or the query fails.
pub async fn list_tables(state: &AppState, scope: Scope) -> Result<Vec<TableRecord>, ReservationError> {
    let Some(pool) = &state.pool else {
        let reason = state.db_issue.as_deref().unwrap_or("no pool configured");
        return Err(ReservationError::NotConfigured(reason.to_owned()));
    };
    let rows = fetch_rows(pool).await?;
    let tables = normalize(&rows, scope);
    tracing::debug!(?scope, rows = rows.len(), listed = tables.len(), "tables listed");
    Ok(tables)
}

async fn fetch_rows(pool: &PgPool) -> Result<Vec<Value>, sqlx::Error> {
    sqlx::query_scalar::<_, Value>(SELECT_ALL_ROWS).fetch_all(pool).await
}

/// Normalize raw rows, apply the scope filter and sort.
#[must_use]
pub fn normalize(rows: &[Value], scope: Scope) -> Vec<TableRecord> {
    let mut tables: Vec<TableRecord> = rows
        .iter()
        .map(TableRecord::from_row)
        .filter(|t| scope == Scope::All || t.is_reserved())
        .collect();
    tables.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    tables
}

#[cfg(test)]
#[path = "reservations_test.rs"]
mod tests;
