//! HTTP service for the MeuAT rural-parcel geospatial API.
//!
//! # Endpoints
//!
//! - `GET /fazendas/{id}` - Look up a parcel by its registry code
//! - `POST /fazendas/busca-ponto` - Parcels containing a point
//! - `POST /fazendas/busca-raio` - Parcels within a radius of a point
//! - `GET /health` - API and database connectivity check
//! - `GET /metrics` - Prometheus metrics endpoint
//! - `GET /` - Informational message
//!
//! # Architecture
//!
//! Handlers are thin: they validate the request, shape a query via
//! `fazendas-lib`, execute it through the store seam, and format the result.
//! All business rules live in the library crate.

#![deny(warnings)]

pub mod handlers;
pub mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod problem;
pub mod request;
pub mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{init_metrics, metrics_handler, MetricsConfig, MetricsError};
pub use middleware::{extract_or_generate_request_id, MetricsLayer, RequestId};
pub use problem::{
    from_lib_error, ProblemDetails, PROBLEM_INTERNAL_ERROR, PROBLEM_INVALID_REQUEST,
    PROBLEM_PARCEL_NOT_FOUND, PROBLEM_SERVICE_UNAVAILABLE,
};
pub use request::{PointSearchRequest, RadiusSearchRequest, Validate};
pub use state::{AppState, AppStateError};

/// Build the service router with all routes and layers wired to `state`.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root))
        .route("/fazendas/{id}", get(handlers::get_parcel))
        .route("/fazendas/busca-ponto", post(handlers::search_containment))
        .route("/fazendas/busca-raio", post(handlers::search_proximity))
        .route("/health", get(health::health))
        .route("/metrics", get(metrics_handler))
        .layer(MetricsLayer)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
