//! Store metrics
//!
//! The store records through the [`metrics`] facade, so nothing is exported
//! unless a recorder is installed. [`install_prometheus_recorder`] installs
//! the Prometheus one.
//!
//! # Metrics
//!
//! - `store_dispatch_total` (counter): actions that reached the reducer
//! - `store_dispatch_errors_total` (counter): dispatches rejected or failed
//! - `store_reducer_duration_seconds` (histogram): time spent in the root reducer
//! - `store_listeners_notified_total` (counter): listener calls
//! - `store_serializable_check_failures_total` (counter): actions that failed to serialize

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use thiserror::Error;

/// Actions that reached the reducer
pub const DISPATCH_TOTAL: &str = "store_dispatch_total";
/// Dispatches rejected by validation or the reentrancy guard, or failed in the reducer
pub const DISPATCH_ERRORS: &str = "store_dispatch_errors_total";
/// Root reducer execution time
pub const REDUCER_DURATION: &str = "store_reducer_duration_seconds";
/// Listener invocations
pub const LISTENERS_NOTIFIED: &str = "store_listeners_notified_total";
/// Actions the serializable check could not serialize
pub const SERIALIZABLE_CHECK_FAILURES: &str = "store_serializable_check_failures_total";

/// Metrics errors
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build the Prometheus exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),

    /// Failed to install the recorder
    #[error("Failed to install metrics recorder: {0}")]
    Install(String),
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(DISPATCH_TOTAL, "Total number of actions dispatched to the reducer");
    describe_counter!(
        DISPATCH_ERRORS,
        "Total number of dispatches that were rejected or failed"
    );
    describe_histogram!(REDUCER_DURATION, "Time taken to run the root reducer");
    describe_counter!(
        LISTENERS_NOTIFIED,
        "Total number of change listener invocations"
    );
    describe_counter!(
        SERIALIZABLE_CHECK_FAILURES,
        "Total number of actions that could not be serialized"
    );
}

/// Install a global Prometheus recorder and return its handle.
///
/// Call [`PrometheusHandle::render`] to produce the text exposition.
///
/// # Errors
///
/// Returns [`MetricsError`] if the exporter cannot be built or a recorder is
/// already installed.
pub fn install_prometheus_recorder() -> Result<PrometheusHandle, MetricsError> {
    register_metrics();

    let handle = PrometheusBuilder::new()
        // Reducers are expected to be fast; buckets start at 10µs
        .set_buckets_for_metric(
            Matcher::Suffix("duration_seconds".to_string()),
            &[
                0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.005, 0.01, 0.032, 0.1, 0.5,
            ],
        )
        .map_err(|e| MetricsError::Build(e.to_string()))?
        .install_recorder()
        .map_err(|e| MetricsError::Install(e.to_string()))?;

    tracing::info!("Prometheus metrics recorder installed");
    Ok(handle)
}
