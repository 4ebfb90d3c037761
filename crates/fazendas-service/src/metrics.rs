//! Prometheus metrics infrastructure.
//!
//! - [`MetricsConfig`]: Configuration for the metrics system
//! - [`init_metrics`]: Initialize the Prometheus metrics recorder
//! - [`metrics_handler`]: Axum handler for the `/metrics` endpoint
//! - Business metric helpers for the search pipeline

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

/// Global Prometheus handle for rendering metrics.
static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Configuration for the metrics system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Whether metrics collection is enabled.
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl MetricsConfig {
    /// Create configuration from `METRICS_ENABLED` ("true"/"false", default true).
    pub fn from_env() -> Self {
        let enabled = std::env::var("METRICS_ENABLED")
            .map(|v| v.to_lowercase() != "false")
            .unwrap_or(true);

        Self { enabled }
    }
}

/// Errors that can occur during metrics initialization.
#[derive(Debug, Clone)]
pub enum MetricsError {
    /// Metrics are disabled in configuration.
    Disabled,
    /// The recorder has already been installed.
    AlreadyInitialized,
    /// The Prometheus builder failed to install.
    InstallFailed(String),
}

impl std::fmt::Display for MetricsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsError::Disabled => write!(f, "metrics are disabled"),
            MetricsError::AlreadyInitialized => write!(f, "metrics recorder already initialized"),
            MetricsError::InstallFailed(e) => {
                write!(f, "failed to install metrics recorder: {}", e)
            }
        }
    }
}

impl std::error::Error for MetricsError {}

/// Initialize the Prometheus metrics recorder.
///
/// Must be called once at application startup before any metrics are
/// recorded; subsequent calls return an error.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Err(MetricsError::Disabled);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)?;

    Ok(())
}

/// Axum handler for the `/metrics` endpoint.
///
/// Returns Prometheus exposition format text.
pub async fn metrics_handler() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(|h| h.render())
        .unwrap_or_else(|| "# Metrics not initialized\n".to_string())
}

// =============================================================================
// Business Metrics Helpers
// =============================================================================

/// Record a completed search.
///
/// Increments the `fazendas_searches_total` counter.
pub fn record_search_performed(mode: &str) {
    metrics::counter!(
        "fazendas_searches_total",
        "mode" => mode.to_string()
    )
    .increment(1);
}

/// Record a failed search.
///
/// Increments the `fazendas_searches_failed_total` counter. `reason` is one
/// of "validation_error", "not_found", or "store_error".
pub fn record_search_failed(reason: &str, mode: &str) {
    metrics::counter!(
        "fazendas_searches_failed_total",
        "reason" => reason.to_string(),
        "mode" => mode.to_string()
    )
    .increment(1);
}

/// Record the number of parcels returned by a search.
///
/// Records to the `fazendas_parcels_returned` histogram.
pub fn record_parcels_returned(count: usize, mode: &str) {
    metrics::histogram!(
        "fazendas_parcels_returned",
        "mode" => mode.to_string()
    )
    .record(count as f64);
}

/// Record rows dropped by the formatter because of malformed geometry.
///
/// Increments the `fazendas_rows_dropped_total` counter.
pub fn record_rows_dropped(count: usize, mode: &str) {
    metrics::counter!(
        "fazendas_rows_dropped_total",
        "mode" => mode.to_string()
    )
    .increment(count as u64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_config_default() {
        let config = MetricsConfig::default();
        assert!(config.enabled);
    }

    #[test]
    fn test_metrics_handler_without_recorder() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let output = rt.block_on(async { metrics_handler().await });

        assert!(output.starts_with('#') || !output.is_empty());
    }

    #[test]
    fn test_business_metric_helpers_do_not_panic() {
        record_search_performed("containment");
        record_search_failed("validation_error", "proximity");
        record_parcels_returned(3, "proximity");
        record_rows_dropped(1, "by_id");
    }

    #[test]
    fn test_metrics_error_display() {
        assert_eq!(MetricsError::Disabled.to_string(), "metrics are disabled");
        assert!(MetricsError::InstallFailed("boom".to_string())
            .to_string()
            .contains("boom"));
    }
}
