//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use super::config::MetricsConfig;

/// Label used for requests that matched no route
const UNMATCHED_PATH: &str = "unmatched";

/// Prometheus handle serving the exposition endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
    path: String,
}

impl PrometheusMetrics {
    pub fn render(&self) -> String {
        self.handle.render()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Handle backed by a recorder that is not installed globally
    #[cfg(test)]
    pub(crate) fn detached(path: &str) -> Self {
        Self {
            handle: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
            path: path.to_string(),
        }
    }
}

/// Install the global Prometheus recorder
///
/// Returns `None` when disabled or when a recorder is already installed.
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("jwt_service_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
            tracing::info!("Prometheus metrics initialized at {}", config.path);

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
                path: config.path.clone(),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

pub fn create_metrics_router(metrics: PrometheusMetrics) -> Router {
    let path = metrics.path().to_string();

    Router::new()
        .route(&path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record an HTTP request; `route` is the matched route template, if any
pub fn record_http_request(method: &str, route: Option<&str>, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", route.unwrap_or(UNMATCHED_PATH).to_string()),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

/// Count a token issue or verify outcome (`issued`, `accepted`, or an error kind)
pub fn record_token_operation(operation: &'static str, outcome: &'static str) {
    counter!("jwt_tokens_total", "operation" => operation, "outcome" => outcome).increment(1);
}

/// Record one signing oracle round trip
pub fn record_oracle_call(
    backend: &'static str,
    operation: &'static str,
    outcome: &'static str,
    duration: Duration,
) {
    let labels = [
        ("backend", backend),
        ("operation", operation),
        ("outcome", outcome),
    ];

    counter!("signing_oracle_calls_total", &labels).increment(1);
    histogram!("signing_oracle_call_duration_seconds", &labels).record(duration.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_metrics() {
        let config = MetricsConfig {
            enabled: false,
            ..Default::default()
        };

        assert!(init_metrics(&config).is_none());
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_http_request("GET", None, 404, Duration::from_millis(1));
        record_token_operation("verify", "expired");
        record_oracle_call("kms", "sign", "success", Duration::from_millis(3));
    }
}
