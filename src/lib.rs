//! Switchyard: a transport-agnostic request/response dispatch engine.
//!
//! Requests are driven through an ordered list of regular routes. The first
//! failure diverts the call to an ordered list of error routes, and the call
//! settles with either the response or the final error.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod host;
pub mod http;
pub mod observability;
pub mod resilience;
pub mod routing;

pub use config::schema::SwitchyardConfig;
pub use dispatch::{App, Context, ErrorPolicy};
pub use error::{ConfigurationError, DispatchError};
pub use http::{Body, Headers, Method, Redaction, Request, RequestOptions, Response};
pub use routing::{
    async_handler, handler_fn, Handler, HandlerResult, PathPattern, Route, RouteOptions, RouteParams,
    RouteTree, Router, SharedHandler,
};
