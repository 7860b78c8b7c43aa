//! Route: a handler with an optional method/path scope.
//!
//! # Responsibilities
//! - Validate construction input (method string, path template)
//! - Skip the handler when the request is out of scope
//! - Normalize every handler outcome into `Ok(())` or `Err(DispatchError)`
//!
//! # Design Decisions
//! - A scope miss is a skip, not a failure; an error route scoped elsewhere
//!   leaves the current error untouched
//! - Panics inside handlers are caught and become dispatch errors
//! - Immutable after construction; cloning shares the handler

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;

use futures_util::FutureExt;
use serde_json::{Map, Value};

use crate::dispatch::Context;
use crate::error::{ConfigurationError, DispatchError};
use crate::http::{Method, Request};
use crate::routing::handler::{HandlerResult, SharedHandler};
use crate::routing::pattern::PathPattern;

/// Construction input for a [`Route`].
#[derive(Clone)]
pub struct RouteOptions {
    pub path: Option<String>,
    pub method: Option<String>,
    pub handler: SharedHandler,
    /// Extra fields copied onto the route untouched.
    pub metadata: Map<String, Value>,
}

impl RouteOptions {
    pub fn new(handler: SharedHandler) -> Self {
        Self {
            path: None,
            method: None,
            handler,
            metadata: Map::new(),
        }
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Shorthand for the `name` metadata field used in logs.
    pub fn name(self, name: impl Into<String>) -> Self {
        self.meta("name", name.into())
    }
}

impl fmt::Debug for RouteOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteOptions")
            .field("path", &self.path)
            .field("method", &self.method)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

/// Anything that can be registered as a route.
pub enum RouteInput {
    Options(RouteOptions),
    Handler(SharedHandler),
    Route(Route),
}

impl RouteInput {
    pub fn into_route(self) -> Result<Route, ConfigurationError> {
        match self {
            RouteInput::Options(options) => Route::new(options),
            RouteInput::Handler(handler) => Ok(Route::from_handler(handler)),
            RouteInput::Route(route) => Ok(route),
        }
    }
}

impl From<RouteOptions> for RouteInput {
    fn from(options: RouteOptions) -> Self {
        RouteInput::Options(options)
    }
}

impl From<SharedHandler> for RouteInput {
    fn from(handler: SharedHandler) -> Self {
        RouteInput::Handler(handler)
    }
}

impl From<Route> for RouteInput {
    fn from(route: Route) -> Self {
        RouteInput::Route(route)
    }
}

/// A scoped or unscoped handler unit.
#[derive(Clone)]
pub struct Route {
    method: Option<Method>,
    pattern: Option<PathPattern>,
    handler: SharedHandler,
    metadata: Map<String, Value>,
}

impl Route {
    /// Build a route from options, validating method and path.
    pub fn new(options: RouteOptions) -> Result<Self, ConfigurationError> {
        let method = Method::parse_scope(options.method.as_deref())?;
        let pattern = options.path.as_deref().map(PathPattern::parse).transpose()?;
        Ok(Self {
            method,
            pattern,
            handler: options.handler,
            metadata: options.metadata,
        })
    }

    /// An unscoped route around a bare handler.
    pub fn from_handler(handler: SharedHandler) -> Self {
        Self {
            method: None,
            pattern: None,
            handler,
            metadata: Map::new(),
        }
    }

    /// Set the `name` metadata field.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.metadata.insert("name".to_string(), Value::String(name.into()));
        self
    }

    /// Method scope; `None` is unconstrained.
    pub fn method(&self) -> Option<Method> {
        self.method
    }

    /// Path scope; `None` matches any path.
    pub fn pattern(&self) -> Option<&PathPattern> {
        self.pattern.as_ref()
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    pub fn name(&self) -> Option<&str> {
        self.metadata.get("name").and_then(Value::as_str)
    }

    /// Whether the request falls inside this route's method and path scope.
    pub fn in_scope(&self, request: &Request) -> bool {
        if let Some(method) = self.method {
            if method.as_str() != request.method() {
                return false;
            }
        }
        match &self.pattern {
            Some(pattern) => pattern.is_match(request.path()),
            None => true,
        }
    }

    /// Run the handler if the request is in scope; otherwise resolve at once.
    pub async fn execute(&self, cx: &mut Context) -> HandlerResult {
        if !self.in_scope(&cx.request) {
            tracing::trace!(route = %self, "Route out of scope, skipping");
            return Ok(());
        }
        self.invoke(cx).await
    }

    /// Run the handler without the scope check.
    pub(crate) async fn invoke(&self, cx: &mut Context) -> HandlerResult {
        tracing::debug!(route = %self, "Running route");
        let handler = &self.handler;
        AssertUnwindSafe(async move { handler.call(cx).settle().await })
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(DispatchError::new(HandlerPanic::from_payload(payload))))
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern.as_ref().map(PathPattern::as_str))
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method = self.method.map_or("all", |m| m.as_str());
        let path = self.pattern.as_ref().map_or("*", PathPattern::as_str);
        match self.name() {
            Some(name) => write!(f, "{name} ({method} {path})"),
            None => write!(f, "{method} {path}"),
        }
    }
}

/// A handler panicked while running.
#[derive(Debug, Clone, thiserror::Error)]
#[error("handler panicked: {message}")]
pub struct HandlerPanic {
    pub message: String,
}

impl HandlerPanic {
    fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        Self { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Response;
    use crate::routing::handler::{async_handler, handler_fn};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn context(method: &str, path: &str) -> Context {
        Context::new(Request::new(method, path), Response::new())
    }

    fn counting(counter: Arc<AtomicUsize>) -> SharedHandler {
        handler_fn(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    #[test]
    fn test_invalid_method_is_configuration_error() {
        let options = RouteOptions::new(handler_fn(|_| Ok(()))).method("fetch");
        assert_eq!(
            Route::new(options).unwrap_err(),
            ConfigurationError::InvalidMethod("fetch".into())
        );
    }

    #[test]
    fn test_metadata_copied_through() {
        let route = Route::new(
            RouteOptions::new(handler_fn(|_| Ok(())))
                .name("auth")
                .meta("weight", 3),
        )
        .unwrap();
        assert_eq!(route.name(), Some("auth"));
        assert_eq!(route.metadata()["weight"], 3);
    }

    #[tokio::test]
    async fn test_out_of_scope_skips_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let route = Route::new(
            RouteOptions::new(counting(calls.clone()))
                .method("post")
                .path("/users/:id"),
        )
        .unwrap();

        route.execute(&mut context("get", "/users/1")).await.unwrap();
        route.execute(&mut context("post", "/orders/1")).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        route.execute(&mut context("POST", "/Users/1")).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_sync_and_async_failures_normalize() {
        let sync = Route::from_handler(handler_fn(|_| Err(DispatchError::msg("sync"))));
        let err = sync.execute(&mut context("get", "/")).await.unwrap_err();
        assert_eq!(err.to_string(), "sync");

        let pending = Route::from_handler(async_handler(|cx| {
            Box::pin(async move {
                tokio::task::yield_now().await;
                cx.response.set_status(201);
                Err(DispatchError::msg("async"))
            })
        }));
        let mut cx = context("get", "/");
        let err = pending.execute(&mut cx).await.unwrap_err();
        assert_eq!(err.to_string(), "async");
        assert_eq!(cx.response.status_code(), 201);
    }

    #[tokio::test]
    async fn test_panic_becomes_dispatch_error() {
        let route = Route::from_handler(handler_fn(|_| panic!("kaboom")));
        let err = route.execute(&mut context("get", "/")).await.unwrap_err();
        assert_eq!(err.downcast_ref::<HandlerPanic>().unwrap().message, "kaboom");
    }

    #[tokio::test]
    async fn test_handler_mutations_visible() {
        let route = Route::from_handler(handler_fn(|cx| {
            cx.request.headers_mut().set("x-seen", "yes");
            cx.response.set_status(418);
            Ok(())
        }));
        let mut cx = context("get", "/");
        route.execute(&mut cx).await.unwrap();
        assert_eq!(cx.request.header("X-Seen"), Some("yes"));
        assert_eq!(cx.response.status_code(), 418);
    }

    #[test]
    fn test_display() {
        let route = Route::new(
            RouteOptions::new(handler_fn(|_| Ok(())))
                .method("GET")
                .path("/a/:b")
                .name("show"),
        )
        .unwrap();
        assert_eq!(route.to_string(), "show (get /a/:b)");
        assert_eq!(Route::from_handler(handler_fn(|_| Ok(()))).to_string(), "all *");
    }
}
