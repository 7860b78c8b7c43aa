//! Endpoint router.
//!
//! # Responsibilities
//! - Collect endpoint routes into a `RouteTree` during wiring
//! - Expose the frozen tree as two ordinary routes for the `App`:
//!   one assigns the matched route onto the request, the other invokes it
//!
//! # Design Decisions
//! - Splitting assign from invoke lets middleware registered between the
//!   two inspect `matched_route` and `route_params`
//! - A request that matches nothing passes through both routes untouched

use std::sync::Arc;

use crate::error::ConfigurationError;
use crate::http::Method;
use crate::routing::handler::{async_handler, handler_fn, SharedHandler};
use crate::routing::route::{Route, RouteInput, RouteOptions};
use crate::routing::tree::RouteTree;

/// Builder around a [`RouteTree`].
#[derive(Debug, Default)]
pub struct Router {
    tree: RouteTree,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an endpoint.
    pub fn add(&mut self, input: impl Into<RouteInput>) -> Result<&mut Self, ConfigurationError> {
        self.tree.add_route(input)?;
        Ok(self)
    }

    /// Register `handler` for `method` (or any method when `None`) at `path`.
    pub fn route(
        &mut self,
        method: Option<Method>,
        path: &str,
        handler: SharedHandler,
    ) -> Result<&mut Self, ConfigurationError> {
        let mut options = RouteOptions::new(handler).path(path);
        if let Some(method) = method {
            options = options.method(method.as_str());
        }
        self.add(options)
    }

    pub fn get(&mut self, path: &str, handler: SharedHandler) -> Result<&mut Self, ConfigurationError> {
        self.route(Some(Method::Get), path, handler)
    }

    pub fn post(&mut self, path: &str, handler: SharedHandler) -> Result<&mut Self, ConfigurationError> {
        self.route(Some(Method::Post), path, handler)
    }

    pub fn put(&mut self, path: &str, handler: SharedHandler) -> Result<&mut Self, ConfigurationError> {
        self.route(Some(Method::Put), path, handler)
    }

    pub fn delete(&mut self, path: &str, handler: SharedHandler) -> Result<&mut Self, ConfigurationError> {
        self.route(Some(Method::Delete), path, handler)
    }

    pub fn patch(&mut self, path: &str, handler: SharedHandler) -> Result<&mut Self, ConfigurationError> {
        self.route(Some(Method::Patch), path, handler)
    }

    pub fn head(&mut self, path: &str, handler: SharedHandler) -> Result<&mut Self, ConfigurationError> {
        self.route(Some(Method::Head), path, handler)
    }

    pub fn options(&mut self, path: &str, handler: SharedHandler) -> Result<&mut Self, ConfigurationError> {
        self.route(Some(Method::Options), path, handler)
    }

    pub fn all(&mut self, path: &str, handler: SharedHandler) -> Result<&mut Self, ConfigurationError> {
        self.route(None, path, handler)
    }

    pub fn tree(&self) -> &RouteTree {
        &self.tree
    }

    /// Freeze the tree and return the `(assign, invoke)` route pair.
    pub fn into_routes(self) -> (Route, Route) {
        let tree = Arc::new(self.tree);

        let assign = Route::from_handler(handler_fn(move |cx| {
            cx.request.matched_route = tree.find(&mut cx.request);
            if cx.request.matched_route.is_none() {
                tracing::trace!(path = %cx.request.path(), "No endpoint matched");
            }
            Ok(())
        }))
        .named("router.assign");

        let invoke = Route::from_handler(async_handler(|cx| {
            Box::pin(async move {
                match cx.request.matched_route.clone() {
                    Some(route) => route.execute(cx).await,
                    None => Ok(()),
                }
            })
        }))
        .named("router.invoke");

        (assign, invoke)
    }
}
