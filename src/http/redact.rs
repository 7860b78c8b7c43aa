//! Redaction-aware rendering.
//!
//! # Responsibilities
//! - Describe which header names and body keys are sensitive
//! - Produce masked copies of headers and body values for rendering
//!
//! # Design Decisions
//! - Rendering never mutates the header map or body value; masking always
//!   works on copies
//! - Matching is case-insensitive for both headers and body keys
//! - Body keys are masked at any depth of a JSON object tree

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::http::body::Body;
use crate::http::headers::Headers;

/// Replacement text for masked values.
pub const REDACTED: &str = "[REDACTED]";

/// Sensitive header names and body keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Redaction {
    pub headers: Vec<String>,
    pub body_keys: Vec<String>,
}

impl Redaction {
    pub fn new<H, B>(headers: H, body_keys: B) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        B: IntoIterator,
        B::Item: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            body_keys: body_keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.body_keys.is_empty()
    }

    fn masks_header(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h.eq_ignore_ascii_case(name))
    }

    fn masks_key(&self, key: &str) -> bool {
        self.body_keys.iter().any(|k| k.eq_ignore_ascii_case(key))
    }

    /// Render headers as a JSON object, masking sensitive values.
    pub fn headers_value(&self, headers: &Headers) -> Value {
        let map: Map<String, Value> = headers
            .iter()
            .map(|(name, value)| {
                let shown = if self.masks_header(name) { REDACTED } else { value };
                (name.to_string(), Value::String(shown.to_string()))
            })
            .collect();
        Value::Object(map)
    }

    /// Render a body as JSON, masking sensitive keys of value bodies.
    pub fn body_value(&self, body: &Body) -> Value {
        match body {
            Body::Empty => Value::Null,
            Body::Stream(_) => Value::String("[stream]".to_string()),
            Body::Value(value) => self.mask(value),
        }
    }

    fn mask(&self, value: &Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| {
                        let shown = if self.masks_key(k) {
                            Value::String(REDACTED.to_string())
                        } else {
                            self.mask(v)
                        };
                        (k.clone(), shown)
                    })
                    .collect(),
            ),
            Value::Array(items) => Value::Array(items.iter().map(|v| self.mask(v)).collect()),
            other => other.clone(),
        }
    }
}

/// Serialize a rendered view as compact or pretty JSON text.
pub(crate) fn write_json(f: &mut std::fmt::Formatter<'_>, value: &Value) -> std::fmt::Result {
    let text = if f.alternate() {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    f.write_str(&text.map_err(|_| std::fmt::Error)?)
}
