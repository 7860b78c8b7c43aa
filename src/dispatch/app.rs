//! The two-stack dispatcher.
//!
//! # Responsibilities
//! - Hold the ordered regular and error route lists
//! - Drive one request through them, diverting to the error list on the
//!   first regular failure
//! - Produce exactly one outcome per call: the response, or the final error
//!
//! # State Transitions
//! ```text
//! Regular:    route ok   → next regular route
//!             route err  → Error(err)
//!             list done  → Resolved(response)
//! Error(e):   out of scope → next error route, e unchanged
//!             route ok     → next error route, e unchanged
//!             route err(f) → next error route with f (replaces e)
//!             list done    → Rejected(e), or Resolved under ErrorPolicy::Recover
//! ```
//!
//! # Design Decisions
//! - Route lists are append-only during wiring and read-only during
//!   dispatch; `process_request` takes `&self` so one `App` serves
//!   concurrent calls
//! - Routes run strictly one after another; no fan-out
//! - No timeout here; wrap slow handlers with `resilience::timeouts`

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::Instrument;

use crate::dispatch::context::Context;
use crate::error::{ConfigurationError, DispatchError};
use crate::http::{Request, Response};
use crate::observability::metrics;
use crate::routing::{Route, RouteInput, Router};

/// What a call returns once error mode has been entered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Always reject with the final current error.
    #[default]
    Reject,
    /// Resolve with the response when the last error route that ran
    /// completed without failing.
    Recover,
}

/// Ordered route lists and the dispatch loop.
#[derive(Debug, Clone, Default)]
pub struct App {
    routes: Vec<Route>,
    error_routes: Vec<Route>,
    policy: ErrorPolicy,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: ErrorPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: ErrorPolicy) -> &mut Self {
        self.policy = policy;
        self
    }

    /// Append a regular route.
    pub fn use_route(&mut self, input: impl Into<RouteInput>) -> Result<&mut Self, ConfigurationError> {
        self.routes.push(input.into().into_route()?);
        Ok(self)
    }

    /// Append an error route.
    pub fn use_error_route(
        &mut self,
        input: impl Into<RouteInput>,
    ) -> Result<&mut Self, ConfigurationError> {
        self.error_routes.push(input.into().into_route()?);
        Ok(self)
    }

    /// Append a router's assign and invoke routes as two regular routes.
    pub fn use_router(&mut self, router: Router) -> &mut Self {
        let (assign, invoke) = router.into_routes();
        self.routes.push(assign);
        self.routes.push(invoke);
        self
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn error_routes(&self) -> &[Route] {
        &self.error_routes
    }

    /// Dispatch one request.
    pub async fn process_request(&self, input: impl Into<Request>) -> Result<Response, DispatchError> {
        let request = input.into();
        let span = tracing::debug_span!(
            "dispatch",
            request_id = %request.id(),
            method = %request.method(),
            path = %request.path(),
        );
        let started = Instant::now();
        let mut cx = Context::new(request, Response::new());

        let outcome = self.run(&mut cx).instrument(span).await;
        match outcome {
            Ok(recovered) => {
                metrics::record_dispatch(if recovered { "recovered" } else { "resolved" }, started);
                Ok(cx.into_parts().1)
            }
            Err(error) => {
                metrics::record_dispatch("rejected", started);
                tracing::debug!(request_id = %cx.request.id(), error = %error, "Dispatch rejected");
                Err(error)
            }
        }
    }

    /// Returns `Ok(true)` when the call resolved after recovering from an error.
    async fn run(&self, cx: &mut Context) -> Result<bool, DispatchError> {
        match self.run_regular(cx).await {
            None => Ok(false),
            Some(error) => self.run_error_routes(cx, error).await.map(|()| true),
        }
    }

    async fn run_regular(&self, cx: &mut Context) -> Option<DispatchError> {
        for (index, route) in self.routes.iter().enumerate() {
            if let Err(error) = route.execute(cx).await {
                tracing::warn!(index, route = %route, error = %error, "Route failed, entering error mode");
                metrics::record_route_failure("regular");
                return Some(error);
            }
        }
        None
    }

    async fn run_error_routes(&self, cx: &mut Context, error: DispatchError) -> Result<(), DispatchError> {
        cx.set_error(error);
        let mut last_succeeded = None;

        for (index, route) in self.error_routes.iter().enumerate() {
            if !route.in_scope(&cx.request) {
                tracing::trace!(index, route = %route, "Error route out of scope, skipping");
                continue;
            }
            match route.invoke(cx).await {
                Ok(()) => last_succeeded = Some(true),
                Err(next) => {
                    tracing::debug!(index, route = %route, error = %next, "Error route failed, replacing current error");
                    metrics::record_route_failure("error");
                    cx.set_error(next);
                    last_succeeded = Some(false);
                }
            }
        }

        let Some(error) = cx.take_error() else {
            return Ok(());
        };
        match (self.policy, last_succeeded) {
            (ErrorPolicy::Recover, Some(true)) => {
                tracing::debug!(error = %error, "Error handled, resolving");
                Ok(())
            }
            _ => Err(error),
        }
    }
}
