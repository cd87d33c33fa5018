/// Health check endpoint
///
/// Verifies that the server is running and the record store answers.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "success",
///   "data": {
///     "status": "healthy",
///     "version": "0.1.0",
///     "database": "connected",
///     "cache": "active",
///     "cache_entries": 2,
///     "sessions": 1
///   },
///   "timestamp": "..."
/// }
/// ```
///
/// A store that does not answer yields `503` with "System unhealthy".

use super::Envelope;
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::extract::State;
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Application version
    pub version: String,

    /// Database status
    pub database: String,

    pub cache: String,

    /// Live entries in the statistics cache
    pub cache_entries: usize,

    /// Open login sessions
    pub sessions: usize,
}

pub async fn health_check(State(state): State<AppState>) -> ApiResult<Envelope<HealthResponse>> {
    if let Err(e) = state.store.ping().await {
        tracing::error!(error = %e, "Health check failed");
        return Err(ApiError::ServiceUnavailable("System unhealthy".to_string()));
    }

    let cache_entries = state
        .cache
        .lock()
        .map(|cache| cache.len())
        .map_err(|_| ApiError::InternalError("cache lock poisoned".to_string()))?;

    state.sessions.purge_expired();

    Ok(Envelope::new(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: "connected".to_string(),
        cache: "active".to_string(),
        cache_entries,
        sessions: state.sessions.len(),
    }))
}
