pub fn init() {
    // Initialize tracing subscriber once, honoring RUST_LOG if set.
    // Logs go to stderr: in stdio mode stdout carries MCP frames.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Record a sample through the metrics facade and echo it as a log line.
pub fn log_metric(operation: &str, metric: &str, value: f64) {
    metrics::histogram!(metric.to_string(), "operation" => operation.to_string()).record(value);
    tracing::debug!(operation = operation, metric = metric, value = value, "metric");
}

/// Count one HubSpot call outcome.
pub fn count_request(operation: &str, status: u16) {
    metrics::counter!(
        "hubspot_requests_total",
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}
