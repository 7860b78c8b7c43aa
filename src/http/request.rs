//! Request value object.
//!
//! # Responsibilities
//! - Normalize method and path on construction
//! - Keep an immutable snapshot of the original path
//! - Carry route parameters and the matched route between routes
//!
//! # Design Decisions
//! - Request ID (UUID v4) assigned at construction for log correlation
//! - Paths are lowercased and lose their trailing slash; `/WoNkY/` becomes
//!   `/wonky`
//! - Rendering goes through the redaction descriptor and never mutates state

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::http::body::Body;
use crate::http::headers::Headers;
use crate::http::redact::{write_json, Redaction};
use crate::routing::{Route, RouteParams};

/// Plain request input, canonicalized into a [`Request`] at dispatch.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RequestOptions {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

/// A request flowing through the dispatcher.
#[derive(Debug)]
pub struct Request {
    id: Uuid,
    method: String,
    path: String,
    original_path: String,
    headers: Headers,
    body: Body,
    /// Parameters captured by the route tree lookup.
    pub route_params: RouteParams,
    /// Endpoint chosen by the router, if any.
    pub matched_route: Option<Route>,
    redaction: Option<Redaction>,
}

impl Request {
    /// Create a request with an empty body.
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            method: method.trim().to_ascii_lowercase(),
            path: normalize_path(path),
            original_path: path.to_string(),
            headers: Headers::new(),
            body: Body::Empty,
            route_params: RouteParams::new(),
            matched_route: None,
            redaction: None,
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }

    pub fn with_body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    pub fn with_redaction(mut self, redaction: Redaction) -> Self {
        self.redaction = Some(redaction);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Lowercase method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Normalized path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Replace the path. The original path snapshot is unchanged.
    pub fn set_path(&mut self, path: &str) {
        self.path = normalize_path(path);
    }

    /// The path exactly as given at construction.
    pub fn original_path(&self) -> &str {
        &self.original_path
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Replace the body, dropping the previous one.
    pub fn set_body(&mut self, body: Body) {
        self.body = body;
    }

    /// Take the body, leaving it empty.
    pub fn take_body(&mut self) -> Body {
        std::mem::take(&mut self.body)
    }

    pub fn redaction(&self) -> Option<&Redaction> {
        self.redaction.as_ref()
    }

    pub fn set_redaction(&mut self, redaction: Option<Redaction>) {
        self.redaction = redaction;
    }

    /// JSON view used by `Display`, with redaction applied.
    pub fn rendered(&self) -> Value {
        let redaction = self.redaction.clone().unwrap_or_default();
        json!({
            "id": self.id.to_string(),
            "method": self.method,
            "path": self.path,
            "originalPath": self.original_path,
            "headers": redaction.headers_value(&self.headers),
            "routeParams": self.route_params,
            "body": redaction.body_value(&self.body),
        })
    }
}

impl From<RequestOptions> for Request {
    fn from(options: RequestOptions) -> Self {
        let method = if options.method.is_empty() { "get" } else { options.method.as_str() };
        let mut request = Request::new(method, &options.path);
        for (name, value) in options.headers {
            request.headers.set(name, value);
        }
        if let Some(value) = options.body {
            request.body = Body::Value(value);
        }
        request
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_json(f, &self.rendered())
    }
}

/// Lowercase a path, ensure a leading slash and drop trailing slashes.
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }
    let lower = trimmed.to_lowercase();
    if lower.starts_with('/') {
        lower
    } else {
        format!("/{lower}")
    }
}
