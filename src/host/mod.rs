//! Host wiring.
//!
//! # Responsibilities
//! - Turn a validated `SwitchyardConfig` into a frozen `App`
//! - Keep the wiring order: middleware, then the router's assign/invoke
//!   pair, then error routes
//!
//! # Design Decisions
//! - Every configured handler gets the configured deadline, if any
//! - Wiring errors surface as `ConfigurationError`; nothing is dispatched
//!   from a partially wired app

pub mod actions;

use std::time::Duration;

use crate::config::{RouteConfig, SwitchyardConfig};
use crate::dispatch::App;
use crate::error::ConfigurationError;
use crate::resilience::timeouts::with_timeout;
use crate::routing::{RouteOptions, Router};

/// Build an application from configuration.
pub fn build_app(config: &SwitchyardConfig) -> Result<App, ConfigurationError> {
    let timeout = config.dispatch.handler_timeout_ms.map(Duration::from_millis);
    let mut app = App::with_policy(config.dispatch.error_policy);

    for route in &config.middleware {
        app.use_route(route_options(route, timeout))?;
    }

    let mut router = Router::new();
    for route in &config.endpoints {
        router.add(route_options(route, timeout))?;
    }
    if !router.tree().is_empty() {
        app.use_router(router);
    }

    for route in &config.error_routes {
        app.use_error_route(route_options(route, timeout))?;
    }

    tracing::info!(
        routes = app.routes().len(),
        endpoints = config.endpoints.len(),
        error_routes = app.error_routes().len(),
        policy = ?app.policy(),
        "Application wired"
    );
    Ok(app)
}

fn route_options(config: &RouteConfig, timeout: Option<Duration>) -> RouteOptions {
    let mut handler = actions::handler_for(&config.action);
    if let Some(limit) = timeout {
        handler = with_timeout(handler, limit);
    }
    let mut options = RouteOptions::new(handler).name(config.name.as_str());
    if let Some(method) = &config.method {
        options = options.method(method.as_str());
    }
    if let Some(path) = &config.path {
        options = options.path(path.as_str());
    }
    options
}
