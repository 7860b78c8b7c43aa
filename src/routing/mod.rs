//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Wiring (before the first request):
//!     RouteOptions / handler / Route
//!     → route.rs (validate method, compile pattern.rs template)
//!     → App route lists, or tree.rs for deterministic endpoints
//!     → router.rs freezes the tree into assign/invoke routes
//!
//! Dispatch:
//!     Route::execute → scope check → handler.rs outcome → Ok / Err
//! ```
//!
//! # Design Decisions
//! - Routes compiled at wiring time, immutable at dispatch time
//! - No regex; segment-by-segment matching only
//! - Deterministic lookup: literal segments win over parameters

pub mod handler;
pub mod pattern;
pub mod route;
pub mod router;
pub mod tree;

pub use handler::{async_handler, handler_fn, Handler, HandlerResult, Outcome, SharedHandler};
pub use pattern::{PathPattern, RouteParams, Segment};
pub use route::{HandlerPanic, Route, RouteInput, RouteOptions};
pub use router::Router;
pub use tree::RouteTree;
