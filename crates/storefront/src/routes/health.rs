//! Health check endpoints.

use axum::{extract::State, http::StatusCode};

use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Loads the catalog (from cache when warm) and returns 503 Service
/// Unavailable if the feed cannot be fetched or parsed.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.catalog().products().await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, source = %state.catalog().source(), "Catalog not ready");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
