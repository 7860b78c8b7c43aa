//! Handler timeout enforcement.
//!
//! # Responsibilities
//! - Wrap a handler so its in-flight work has a deadline
//! - Turn an elapsed deadline into an ordinary dispatch failure
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors (`HandlerTimeout`)
//! - Synchronous outcomes pass through untouched; only pending work can
//!   stall
//! - A timed-out handler's future is dropped, cancelling it

use std::sync::Arc;
use std::time::Duration;

use crate::dispatch::Context;
use crate::error::DispatchError;
use crate::routing::{Handler, Outcome, SharedHandler};

/// The wrapped handler did not settle in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("handler timed out after {0:?}")]
pub struct HandlerTimeout(pub Duration);

/// Handler adapter racing the inner handler against a timer.
pub struct Timeout {
    inner: SharedHandler,
    limit: Duration,
}

impl Timeout {
    pub fn new(inner: SharedHandler, limit: Duration) -> Self {
        Self { inner, limit }
    }
}

impl Handler for Timeout {
    fn call<'a>(&'a self, cx: &'a mut Context) -> Outcome<'a> {
        match self.inner.call(cx) {
            Outcome::Ready(result) => Outcome::Ready(result),
            Outcome::Pending(fut) => {
                let limit = self.limit;
                Outcome::Pending(Box::pin(async move {
                    match tokio::time::timeout(limit, fut).await {
                        Ok(result) => result,
                        Err(_) => {
                            tracing::warn!(timeout = ?limit, "Handler timed out");
                            Err(DispatchError::new(HandlerTimeout(limit)))
                        }
                    }
                }))
            }
        }
    }
}

/// Wrap `handler` with a deadline.
pub fn with_timeout(handler: SharedHandler, limit: Duration) -> SharedHandler {
    Arc::new(Timeout::new(handler, limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Request, Response};
    use crate::routing::{async_handler, handler_fn, Route};

    fn context() -> Context {
        Context::new(Request::new("get", "/"), Response::new())
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_handler_times_out() {
        let slow = async_handler(|_| {
            Box::pin(async move {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            })
        });
        let route = Route::from_handler(with_timeout(slow, Duration::from_millis(50)));
        let err = route.execute(&mut context()).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<HandlerTimeout>(),
            Some(&HandlerTimeout(Duration::from_millis(50)))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_handler_completes() {
        let fast = async_handler(|cx| {
            Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                cx.response.set_status(204);
                Ok(())
            })
        });
        let route = Route::from_handler(with_timeout(fast, Duration::from_secs(1)));
        let mut cx = context();
        route.execute(&mut cx).await.unwrap();
        assert_eq!(cx.response.status_code(), 204);
    }

    #[tokio::test]
    async fn test_sync_outcome_passes_through() {
        let failing = handler_fn(|_| Err(DispatchError::msg("sync")));
        let route = Route::from_handler(with_timeout(failing, Duration::from_millis(1)));
        let err = route.execute(&mut context()).await.unwrap_err();
        assert_eq!(err.to_string(), "sync");
    }
}
