//! Prometheus metrics for the scheduling facade and reservation engine.
//!
//! Counters track committed changes and rejections by reason; a histogram
//! tracks operation latency. Nothing is exported until a recorder is
//! installed, so library users that do not care about metrics pay nothing.
//!
//! # Example
//!
//! ```rust,no_run
//! use cinema_runtime::metrics::MetricsRecorder;
//!
//! # fn example() -> Result<(), cinema_runtime::metrics::MetricsError> {
//! let recorder = MetricsRecorder::install()?;
//! if let Some(text) = recorder.render() {
//!     println!("{text}");
//! }
//! # Ok(())
//! # }
//! ```

use cinema_core::CinemaError;
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Instant;
use thiserror::Error;

// Re-export metrics macros for use in other modules
pub use metrics::{counter, histogram};

/// Screenings committed
pub const SCREENINGS_CREATED: &str = "cinema_screenings_created_total";
/// Rooms created
pub const ROOMS_CREATED: &str = "cinema_rooms_created_total";
/// Bookings committed
pub const BOOKINGS: &str = "cinema_bookings_total";
/// Cancellations committed
pub const CANCELLATIONS: &str = "cinema_cancellations_total";
/// Failed operations, labelled by `reason`
pub const REJECTIONS: &str = "cinema_rejections_total";
/// Commits refused by an optimistic-concurrency guard
pub const COMMIT_CONFLICTS: &str = "cinema_commit_conflicts_total";
/// Operation latency, labelled by `operation`
pub const OPERATION_DURATION: &str = "cinema_operation_duration_seconds";

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Handle to the installed Prometheus recorder.
pub struct MetricsRecorder {
    handle: Option<PrometheusHandle>,
}

impl std::fmt::Debug for MetricsRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsRecorder")
            .field("installed", &self.handle.is_some())
            .finish_non_exhaustive()
    }
}

impl MetricsRecorder {
    /// Describe all metrics and install a global Prometheus recorder.
    ///
    /// If another recorder is already installed (common in tests) the call
    /// succeeds but [`MetricsRecorder::render`] returns `None`.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError`] if the exporter cannot be built or installed.
    pub fn install() -> Result<Self, MetricsError> {
        register_metrics();

        let builder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Full(OPERATION_DURATION.to_string()),
                &[0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        match builder.install_recorder() {
            Ok(handle) => {
                tracing::info!("Metrics recorder installed");
                Ok(Self {
                    handle: Some(handle),
                })
            }
            Err(e) => {
                let err_msg = e.to_string();
                if err_msg.contains("already initialized") {
                    tracing::warn!("Metrics recorder already initialized, skipping re-initialization");
                    Ok(Self { handle: None })
                } else {
                    Err(MetricsError::Install(err_msg))
                }
            }
        }
    }

    /// Get the metrics handle for rendering.
    #[must_use]
    pub const fn handle(&self) -> Option<&PrometheusHandle> {
        self.handle.as_ref()
    }

    /// Render current metrics in Prometheus text format.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(SCREENINGS_CREATED, "Total number of screenings scheduled");
    describe_counter!(ROOMS_CREATED, "Total number of screening rooms created");
    describe_counter!(BOOKINGS, "Total number of seats booked");
    describe_counter!(CANCELLATIONS, "Total number of bookings cancelled");
    describe_counter!(
        REJECTIONS,
        "Total number of failed operations, by error kind"
    );
    describe_counter!(
        COMMIT_CONFLICTS,
        "Total number of commits refused by a version guard"
    );
    describe_histogram!(
        OPERATION_DURATION,
        "Time taken by scheduling and reservation operations"
    );
}

/// Record the outcome and latency of one public operation.
pub(crate) fn observe<T>(
    operation: &'static str,
    started: Instant,
    result: &Result<T, CinemaError>,
) {
    histogram!(OPERATION_DURATION, "operation" => operation)
        .record(started.elapsed().as_secs_f64());

    if let Err(error) = result {
        counter!(REJECTIONS, "reason" => error.kind()).increment(1);
        if error.is_retryable() {
            counter!(COMMIT_CONFLICTS).increment(1);
        }
        tracing::warn!(operation, reason = error.kind(), error = %error, "Operation rejected");
    }
}
