//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Route handler:
//!     → timeouts.rs (race pending work against a deadline)
//!     → On elapse: HandlerTimeout fails the route like any other error
//! ```
//!
//! # Design Decisions
//! - Deadlines are opt-in per handler; the dispatcher itself never times out
//! - Adapters are handlers, so they compose with any route
pub mod timeouts;
