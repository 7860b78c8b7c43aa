//! Error taxonomy.
//!
//! # Responsibilities
//! - `ConfigurationError`: invalid wiring detected while routes are built
//! - `DispatchError`: any failure produced by a handler during dispatch
//!
//! # Design Decisions
//! - Configuration errors are synchronous and fatal to setup
//! - Dispatch errors are data: cloned into each error route's context and
//!   finally surfaced as the call's rejection
//! - Any `std::error::Error` converts into `DispatchError` with `?`

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Invalid wiring input. Raised while building routes, never during dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("invalid method {0:?}")]
    InvalidMethod(String),

    #[error("invalid path pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("pattern {0:?} contains a wildcard or optional group and cannot be indexed")]
    NonDeterministicPattern(String),

    #[error("route {0} has no path and cannot be indexed")]
    MissingPath(String),

    #[error("parameter :{found} conflicts with :{existing} at segment {position} of {pattern:?}")]
    ConflictingParameter {
        pattern: String,
        position: usize,
        existing: String,
        found: String,
    },

    #[error("a route for {method} {pattern:?} is already registered")]
    DuplicateRoute { method: String, pattern: String },
}

/// A failure produced by a route handler.
///
/// Cloning is cheap; the underlying error is shared.
#[derive(Clone)]
pub struct DispatchError {
    inner: Arc<dyn StdError + Send + Sync + 'static>,
}

impl DispatchError {
    /// Wrap an error value.
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(error),
        }
    }

    /// Build an error from a plain message.
    pub fn msg(message: impl fmt::Display) -> Self {
        Self::new(Message(message.to_string()))
    }

    /// Borrow the underlying error as a concrete type, if it is one.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: StdError + 'static,
    {
        let inner: &(dyn StdError + 'static) = self.inner.as_ref();
        inner.downcast_ref::<E>()
    }

    /// Whether the underlying error is of type `E`.
    pub fn is<E>(&self) -> bool
    where
        E: StdError + 'static,
    {
        self.downcast_ref::<E>().is_some()
    }

    /// Whether both values share the same underlying error.
    pub fn same_as(&self, other: &DispatchError) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.inner), Arc::as_ptr(&other.inner))
    }
}

impl<E> From<E> for DispatchError
where
    E: StdError + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Self::new(error)
    }
}

impl From<DispatchError> for Box<dyn StdError + Send + Sync + 'static> {
    fn from(error: DispatchError) -> Self {
        Box::new(Shared(error.inner))
    }
}

impl fmt::Debug for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

#[derive(Debug)]
struct Message(String);

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl StdError for Message {}

/// Adapter that lets a shared error leave the crate as a boxed error.
#[derive(Debug)]
struct Shared(Arc<dyn StdError + Send + Sync + 'static>);

impl fmt::Display for Shared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl StdError for Shared {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}
