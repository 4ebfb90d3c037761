//! Infrastructure endpoints: health check and root message.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::state::AppState;

/// Health status response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// "healthy" or "unhealthy".
    pub status: String,

    /// "connected" or "unreachable".
    pub database: String,

    /// Service name for identification.
    pub service: String,

    /// Service version from build-time.
    pub version: String,
}

impl HealthStatus {
    /// Create a healthy status with a live database connection.
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            database: "connected".to_string(),
            service: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Create an unhealthy status for a lost database connection.
    pub fn unhealthy() -> Self {
        Self {
            status: "unhealthy".to_string(),
            database: "unreachable".to_string(),
            service: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// `GET /health` — verify the API is up and the store handshake works.
///
/// Runs the store's cheap ping (`SELECT 1`). A failed ping returns 503 and
/// logs at error level; the caller never sees the underlying error text.
pub async fn health(State(state): State<AppState>) -> Response {
    match state.store().ping() {
        Ok(()) => (StatusCode::OK, Json(HealthStatus::healthy())).into_response(),
        Err(e) => {
            error!(error = %e, "health check failed: database connection lost");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthStatus::unhealthy()),
            )
                .into_response()
        }
    }
}

/// `GET /` — informational message.
pub async fn root() -> impl IntoResponse {
    Json(json!({
        "message": "Rural-parcel geospatial API is running. Query /fazendas for parcel data."
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_status_healthy() {
        let status = HealthStatus::healthy();
        assert_eq!(status.status, "healthy");
        assert_eq!(status.database, "connected");
        assert_eq!(status.service, env!("CARGO_PKG_NAME"));
    }

    #[test]
    fn test_health_status_unhealthy() {
        let status = HealthStatus::unhealthy();
        assert_eq!(status.status, "unhealthy");
        assert_eq!(status.database, "unreachable");
    }

    #[test]
    fn test_health_status_serialization() {
        let json = serde_json::to_string(&HealthStatus::healthy()).unwrap();
        assert!(json.contains("\"status\":\"healthy\""));
        assert!(json.contains("\"database\":\"connected\""));
    }
}
