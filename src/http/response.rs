//! Response value object.
//!
//! # Responsibilities
//! - Hold status, headers and body produced by routes
//! - Track the one-way `ended` flag
//! - Render with redaction, unless redaction is disabled
//!
//! # Design Decisions
//! - Fresh responses start at 200 with no headers and an empty body
//! - Status is a plain integer; non-numeric assignment is a type error

use std::fmt;

use serde_json::{json, Value};

use crate::http::body::Body;
use crate::http::headers::Headers;
use crate::http::redact::{write_json, Redaction};

/// A response built up by routes during dispatch.
#[derive(Debug)]
pub struct Response {
    status_code: u16,
    headers: Headers,
    body: Body,
    ended: bool,
    redaction: Option<Redaction>,
    redaction_disabled: bool,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status_code: 200,
            headers: Headers::new(),
            body: Body::Empty,
            ended: false,
            redaction: None,
            redaction_disabled: false,
        }
    }
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn set_status(&mut self, status: u16) {
        self.status_code = status;
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

    pub fn take_body(&mut self) -> Body {
        std::mem::take(&mut self.body)
    }

    /// Mark the response as finished. Cannot be undone.
    pub fn end(&mut self) {
        self.ended = true;
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn redaction(&self) -> Option<&Redaction> {
        self.redaction.as_ref()
    }

    pub fn set_redaction(&mut self, redaction: Option<Redaction>) {
        self.redaction = redaction;
    }

    /// Render headers and body verbatim, ignoring any redaction descriptor.
    pub fn disable_redaction(&mut self, disabled: bool) {
        self.redaction_disabled = disabled;
    }

    /// JSON view used by `Display`.
    pub fn rendered(&self) -> Value {
        let redaction = match (&self.redaction, self.redaction_disabled) {
            (Some(r), false) => r.clone(),
            _ => Redaction::default(),
        };
        json!({
            "statusCode": self.status_code,
            "ended": self.ended,
            "headers": redaction.headers_value(&self.headers),
            "body": redaction.body_value(&self.body),
        })
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_json(f, &self.rendered())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::redact::REDACTED;

    #[test]
    fn test_defaults() {
        let res = Response::new();
        assert_eq!(res.status_code(), 200);
        assert!(res.headers().is_empty());
        assert!(res.body().is_empty());
        assert!(!res.is_ended());
    }

    #[test]
    fn test_end_is_one_way() {
        let mut res = Response::new();
        res.end();
        res.end();
        assert!(res.is_ended());
    }

    #[test]
    fn test_render_respects_disable_flag() {
        let mut res = Response::new();
        res.headers_mut().set("Set-Cookie", "sid=1");
        res.set_body(Body::from_value(json!({"token": "abc"})));
        res.set_redaction(Some(Redaction::new(["set-cookie"], ["token"])));

        let masked = res.rendered();
        assert_eq!(masked["headers"]["set-cookie"], REDACTED);
        assert_eq!(masked["body"]["token"], REDACTED);

        res.disable_redaction(true);
        let plain = res.rendered();
        assert_eq!(plain["headers"]["set-cookie"], "sid=1");
        assert_eq!(plain["body"]["token"], "abc");
    }

    #[test]
    fn test_pretty_display() {
        let res = Response::new();
        let pretty = format!("{res:#}");
        assert!(pretty.contains("\n"));
        let compact = res.to_string();
        assert!(!compact.contains('\n'));
    }
}
