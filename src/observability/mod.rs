//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! dispatch / routing produce:
//!     → logging.rs (structured log events, one span per dispatch)
//!     → metrics.rs (counters, histograms)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through the dispatch span
//! - Metrics are cheap facade calls; no exporter is installed here

pub mod logging;
pub mod metrics;
