//! Path template compilation and matching.
//!
//! # Syntax
//! - `users`: literal segment, compared case-insensitively
//! - `:id`: named parameter, captures exactly one segment
//! - `*`: wildcard, consumes exactly one segment without capturing
//! - `(...)`: trailing optional group, e.g. `/files(/:dir/:name)`
//!
//! # Design Decisions
//! - Segments are split on `/`; empty segments are ignored, so `/a/` and
//!   `a` are the same path
//! - The optional group is all-or-nothing: either no segments remain at the
//!   group boundary, or the whole group must match
//! - Wildcards and optional groups are only meant for scoping; the route
//!   tree rejects them

use std::collections::BTreeMap;
use std::fmt;
use std::iter::Peekable;

use serde::Serialize;

use crate::error::ConfigurationError;

/// Captured parameter values, keyed by parameter name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RouteParams(BTreeMap<String, String>);

impl RouteParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RouteParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// One compiled segment specifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Lowercased literal text.
    Literal(String),
    /// Named parameter.
    Param(String),
    /// Single-segment wildcard.
    Wildcard,
}

impl Segment {
    fn accept(&self, candidate: &str, params: &mut RouteParams) -> bool {
        match self {
            Segment::Literal(text) => text.eq_ignore_ascii_case(candidate),
            Segment::Param(name) => {
                params.insert(name.as_str(), candidate);
                true
            }
            Segment::Wildcard => true,
        }
    }
}

/// A compiled path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    required: Vec<Segment>,
    optional: Option<Vec<Segment>>,
}

/// Split a path into its non-empty segments.
pub fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

impl PathPattern {
    /// Compile a template.
    pub fn parse(template: &str) -> Result<Self, ConfigurationError> {
        let invalid = |reason: &str| ConfigurationError::InvalidPattern {
            pattern: template.to_string(),
            reason: reason.to_string(),
        };

        let (prefix, group) = match template.find('(') {
            None if template.contains(')') => return Err(invalid("unbalanced ')'")),
            None => (template, None),
            Some(open) => {
                let rest = &template[open + 1..];
                let Some(inner) = rest.strip_suffix(')') else {
                    return Err(invalid("optional group must close at the end of the pattern"));
                };
                if inner.contains(['(', ')']) {
                    return Err(invalid("optional groups cannot be nested or repeated"));
                }
                let prefix = &template[..open];
                if !(prefix.is_empty() || prefix.ends_with('/') || inner.starts_with('/')) {
                    return Err(invalid("optional group must start at a segment boundary"));
                }
                (prefix, Some(inner))
            }
        };

        let mut names = Vec::new();
        let required = compile_segments(prefix, &mut names).map_err(|r| invalid(r))?;
        let optional = match group {
            None => None,
            Some(inner) => {
                let segments = compile_segments(inner, &mut names).map_err(|r| invalid(r))?;
                if segments.is_empty() {
                    return Err(invalid("optional group is empty"));
                }
                Some(segments)
            }
        };

        Ok(Self {
            source: template.to_string(),
            required,
            optional,
        })
    }

    /// The template this pattern was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Segments that must always be present.
    pub fn segments(&self) -> &[Segment] {
        &self.required
    }

    /// Segments of the trailing optional group, if any.
    pub fn optional_segments(&self) -> Option<&[Segment]> {
        self.optional.as_deref()
    }

    /// True when the pattern has no wildcard and no optional group.
    pub fn is_deterministic(&self) -> bool {
        self.optional.is_none() && !self.required.contains(&Segment::Wildcard)
    }

    /// Match a path, returning the captured parameters on success.
    pub fn match_path(&self, path: &str) -> Option<RouteParams> {
        let mut candidates = split_segments(path).peekable();
        let mut params = RouteParams::new();

        if !accept_all(&self.required, &mut candidates, &mut params) {
            return None;
        }
        if let Some(group) = &self.optional {
            if candidates.peek().is_some() && !accept_all(group, &mut candidates, &mut params) {
                return None;
            }
        }
        if candidates.next().is_some() {
            return None;
        }
        Some(params)
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.match_path(path).is_some()
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn accept_all<'p, I>(
    specs: &[Segment],
    candidates: &mut Peekable<I>,
    params: &mut RouteParams,
) -> bool
where
    I: Iterator<Item = &'p str>,
{
    specs.iter().all(|spec| match candidates.next() {
        Some(candidate) => spec.accept(candidate, params),
        None => false,
    })
}

fn compile_segments(
    template: &str,
    names: &mut Vec<String>,
) -> Result<Vec<Segment>, &'static str> {
    split_segments(template)
        .map(|raw| {
            if raw == "*" {
                return Ok(Segment::Wildcard);
            }
            let Some(name) = raw.strip_prefix(':') else {
                return Ok(Segment::Literal(raw.to_lowercase()));
            };
            if name.is_empty() {
                return Err("parameter name is empty");
            }
            if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err("parameter names may only contain letters, digits and '_'");
            }
            if names.iter().any(|n| n == name) {
                return Err("parameter name is used twice");
            }
            names.push(name.to_string());
            Ok(Segment::Param(name.to_string()))
        })
        .collect()
}
