//! Table list routes.
//!
//! Both endpoints answer with a JSON array of normalized rows. Failures never
//! surface as a non-JSON body: production callers get `[]` (with 500 when a
//! query failed), and `?debug=1` swaps in a diagnostic object.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;

use crate::services::reservations::{self, ReservationError, Scope};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub debug: Option<String>,
}

impl ListQuery {
    fn debug(&self) -> bool {
        self.debug.as_deref() == Some("1")
    }
}

/// `GET /tables/reserved`: reserved or booked tables.
pub async fn reserved(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Response {
    list(&state, Scope::Reserved, query.debug()).await
}

/// `GET /tables/all`: every table.
pub async fn all(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Response {
    list(&state, Scope::All, query.debug()).await
}

async fn list(state: &AppState, scope: Scope, debug: bool) -> Response {
    match reservations::list_tables(state, scope).await {
        Ok(tables) => Json(tables).into_response(),
        Err(err) => error_response(&err, debug),
    }
}

pub(crate) fn error_response(err: &ReservationError, debug: bool) -> Response {
    if err.is_connection() {
        tracing::warn!(error = %err, "table list requested without a database");
        if debug {
            return Json(json!({
                "success": false,
                "error": "No DB connection",
                "details": [err.to_string()],
            }))
            .into_response();
        }
        return Json(json!([])).into_response();
    }

    tracing::error!(error = %err, "table list query failed");
    let body = if debug { json!({ "success": false, "error": err.to_string() }) } else { json!([]) };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

#[cfg(test)]
#[path = "tables_test.rs"]
mod tests;
