//! Dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! process_request(input)
//!     → canonicalize Request, fresh Response
//!     → regular routes, in order, each fully settled before the next
//!     → on first failure: error routes, in order, carrying the current error
//!     → Ok(Response) or Err(final error)
//! ```

pub mod app;
pub mod context;

pub use app::{App, ErrorPolicy};
pub use context::Context;
