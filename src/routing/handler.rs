//! Route handlers.
//!
//! # Responsibilities
//! - Define the callable unit a route wraps
//! - Normalize synchronous and asynchronous handlers into one outcome type
//!
//! # Design Decisions
//! - A handler either finishes immediately (`Outcome::Ready`) or hands back
//!   an in-flight future (`Outcome::Pending`) that the route adopts as-is
//! - Handlers borrow the context mutably; the dispatcher guarantees no other
//!   route touches it until the outcome settles

use std::fmt;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::dispatch::Context;
use crate::error::DispatchError;

/// Result of running a handler to completion.
pub type HandlerResult = Result<(), DispatchError>;

/// What a handler produced when it was called.
pub enum Outcome<'a> {
    /// Finished synchronously.
    Ready(HandlerResult),
    /// Still running; resolves once the future settles.
    Pending(BoxFuture<'a, HandlerResult>),
}

impl<'a> Outcome<'a> {
    /// Drive the outcome to a result.
    pub async fn settle(self) -> HandlerResult {
        match self {
            Outcome::Ready(result) => result,
            Outcome::Pending(fut) => fut.await,
        }
    }
}

impl fmt::Debug for Outcome<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Ready(result) => f.debug_tuple("Ready").field(result).finish(),
            Outcome::Pending(_) => f.write_str("Pending"),
        }
    }
}

/// A unit of request processing.
pub trait Handler: Send + Sync + 'static {
    fn call<'a>(&'a self, cx: &'a mut Context) -> Outcome<'a>;
}

/// Shared handle to a handler.
pub type SharedHandler = Arc<dyn Handler>;

/// Adapter for synchronous closures.
pub struct SyncFn<F>(F);

impl<F> Handler for SyncFn<F>
where
    F: Fn(&mut Context) -> HandlerResult + Send + Sync + 'static,
{
    fn call<'a>(&'a self, cx: &'a mut Context) -> Outcome<'a> {
        Outcome::Ready((self.0)(cx))
    }
}

/// Adapter for closures returning a boxed future.
pub struct AsyncFn<F>(F);

impl<F> Handler for AsyncFn<F>
where
    F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, HandlerResult> + Send + Sync + 'static,
{
    fn call<'a>(&'a self, cx: &'a mut Context) -> Outcome<'a> {
        Outcome::Pending((self.0)(cx))
    }
}

/// Wrap a synchronous closure.
///
/// ```
/// use switchyard::routing::handler_fn;
///
/// let handler = handler_fn(|cx| {
///     cx.response.set_status(204);
///     Ok(())
/// });
/// # let _ = handler;
/// ```
pub fn handler_fn<F>(f: F) -> SharedHandler
where
    F: Fn(&mut Context) -> HandlerResult + Send + Sync + 'static,
{
    Arc::new(SyncFn(f))
}

/// Wrap a closure that returns a boxed future borrowing the context.
///
/// ```
/// use switchyard::routing::async_handler;
///
/// let handler = async_handler(|cx| {
///     Box::pin(async move {
///         tokio::task::yield_now().await;
///         cx.response.set_status(202);
///         Ok(())
///     })
/// });
/// # let _ = handler;
/// ```
pub fn async_handler<F>(f: F) -> SharedHandler
where
    F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, HandlerResult> + Send + Sync + 'static,
{
    Arc::new(AsyncFn(f))
}
