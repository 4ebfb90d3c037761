//! Service entry point.
//!
//! # Configuration
//!
//! - `FAZENDAS_DB_PATH` - Path to the SpatiaLite parcel database (default: /data/fazendas.db)
//! - `SERVICE_PORT` - HTTP port (default: 8004)
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text
//! - `METRICS_ENABLED` - "false" to skip the Prometheus recorder

use std::env;
use std::net::SocketAddr;

use tracing::{error, info};

use fazendas_service::{app, init_logging, init_metrics, AppState, LoggingConfig, MetricsConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging_config = LoggingConfig::from_env();
    init_logging(&logging_config);

    let metrics_config = MetricsConfig::from_env();
    if let Err(e) = init_metrics(&metrics_config) {
        // Metrics are optional; the service runs without them.
        tracing::warn!(error = %e, "failed to initialize metrics, continuing without metrics");
    }

    let db_path =
        env::var("FAZENDAS_DB_PATH").unwrap_or_else(|_| "/data/fazendas.db".to_string());
    let port: u16 = env::var("SERVICE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8004);

    info!(db_path = %db_path, port = port, "starting fazendas service");

    let state = AppState::open(&db_path).map_err(|e| {
        error!(error = %e, path = %db_path, "failed to open parcel store");
        e
    })?;

    let router = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
