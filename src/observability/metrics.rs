//! Dispatch metrics.
//!
//! # Metrics
//! - `switchyard_dispatch_total` (counter): calls by outcome
//!   (`resolved`, `recovered`, `rejected`)
//! - `switchyard_dispatch_duration_seconds` (histogram): call latency
//! - `switchyard_route_failures_total` (counter): route failures by stage
//!   (`regular`, `error`)
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; the host installs an exporter
//!   if it wants one, otherwise updates are no-ops

use std::time::Instant;

/// Record the outcome and latency of one `process_request` call.
pub fn record_dispatch(outcome: &'static str, started: Instant) {
    ::metrics::counter!("switchyard_dispatch_total", "outcome" => outcome).increment(1);
    ::metrics::histogram!("switchyard_dispatch_duration_seconds")
        .record(started.elapsed().as_secs_f64());
}

/// Record a failed route. `stage` is `regular` or `error`.
pub fn record_route_failure(stage: &'static str) {
    ::metrics::counter!("switchyard_route_failures_total", "stage" => stage).increment(1);
}
