use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Install the global Prometheus recorder and describe all metrics
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;

    init_metric_descriptions();

    Ok(handle)
}

/// Describe metrics (safe to call more than once)
fn init_metric_descriptions() {
    describe_counter!(
        "home_price_requests_total",
        "Total number of API requests"
    );
    describe_counter!(
        "home_price_errors_total",
        "Total number of failed API requests"
    );
    describe_histogram!(
        "home_price_request_duration_seconds",
        "Request duration in seconds"
    );
    describe_counter!(
        "home_price_unknown_location_total",
        "Estimates computed without a matching location column"
    );
    describe_gauge!(
        "home_price_estimator_info",
        "Estimator version and build information"
    );

    gauge!("home_price_estimator_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

pub fn record_request(endpoint: &str) {
    counter!("home_price_requests_total", "endpoint" => endpoint.to_string()).increment(1);
}

pub fn record_duration(endpoint: &str, duration: Duration) {
    histogram!(
        "home_price_request_duration_seconds",
        "endpoint" => endpoint.to_string(),
    )
    .record(duration.as_secs_f64());
}

pub fn record_error(endpoint: &str, error_type: &str) {
    counter!(
        "home_price_errors_total",
        "endpoint" => endpoint.to_string(),
        "error_type" => error_type.to_string(),
    )
    .increment(1);
}

pub fn record_unknown_location() {
    counter!("home_price_unknown_location_total").increment(1);
}
