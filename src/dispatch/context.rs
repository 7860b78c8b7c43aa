//! Per-request dispatch context.

use crate::error::DispatchError;
use crate::http::{Request, Response};

/// The request/response pair threaded through every route of one call,
/// plus the current error once the call is in error mode.
#[derive(Debug)]
pub struct Context {
    pub request: Request,
    pub response: Response,
    error: Option<DispatchError>,
}

impl Context {
    pub fn new(request: Request, response: Response) -> Self {
        Self {
            request,
            response,
            error: None,
        }
    }

    /// The current error. Always `None` for regular routes.
    pub fn error(&self) -> Option<&DispatchError> {
        self.error.as_ref()
    }

    pub(crate) fn set_error(&mut self, error: DispatchError) {
        self.error = Some(error);
    }

    pub(crate) fn take_error(&mut self) -> Option<DispatchError> {
        self.error.take()
    }

    pub fn into_parts(self) -> (Request, Response) {
        (self.request, self.response)
    }
}
