//! Exact-match route index.
//!
//! # Responsibilities
//! - Index deterministic routes (literals and parameters only) by path
//!   segment, with a method map at each leaf
//! - Resolve a request to at most one route and capture its parameters
//!
//! # Design Decisions
//! - Invalid routes are rejected at insertion, never at lookup
//! - Single-path walk: a literal child wins over the parameter slot at every
//!   position and is never revisited, so lookup cost tracks the segment
//!   count only
//! - Re-registering the same method and path is a configuration error
//! - Frozen after wiring; lookups take `&self`

use std::collections::HashMap;

use crate::error::ConfigurationError;
use crate::http::{Method, Request};
use crate::routing::pattern::{split_segments, Segment};
use crate::routing::route::{Route, RouteInput};

#[derive(Debug, Default)]
struct Node {
    literals: HashMap<String, Node>,
    param: Option<(String, Box<Node>)>,
    /// Leaf routes keyed by method; `None` is the unconstrained key.
    routes: HashMap<Option<Method>, Route>,
}

/// Trie of deterministic routes.
#[derive(Debug, Default)]
pub struct RouteTree {
    root: Node,
    len: usize,
}

impl RouteTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a route.
    pub fn add_route(&mut self, input: impl Into<RouteInput>) -> Result<(), ConfigurationError> {
        let route = input.into().into_route()?;
        let Some(pattern) = route.pattern() else {
            return Err(ConfigurationError::MissingPath(route.to_string()));
        };
        if !pattern.is_deterministic() {
            return Err(ConfigurationError::NonDeterministicPattern(
                pattern.as_str().to_string(),
            ));
        }

        let mut node = &mut self.root;
        for (position, segment) in pattern.segments().iter().enumerate() {
            node = match segment {
                Segment::Literal(text) => node.literals.entry(text.clone()).or_default(),
                Segment::Param(name) => {
                    let (existing, child) = node
                        .param
                        .get_or_insert_with(|| (name.clone(), Box::default()));
                    if *existing != *name {
                        return Err(ConfigurationError::ConflictingParameter {
                            pattern: pattern.as_str().to_string(),
                            position,
                            existing: existing.clone(),
                            found: name.clone(),
                        });
                    }
                    &mut **child
                }
                Segment::Wildcard => {
                    return Err(ConfigurationError::NonDeterministicPattern(
                        pattern.as_str().to_string(),
                    ))
                }
            };
        }

        let key = route.method();
        if node.routes.contains_key(&key) {
            return Err(ConfigurationError::DuplicateRoute {
                method: key.map_or("all", |m| m.as_str()).to_string(),
                pattern: pattern.as_str().to_string(),
            });
        }
        tracing::debug!(route = %route, "Indexed route");
        node.routes.insert(key, route);
        self.len += 1;
        Ok(())
    }

    /// Resolve a request to a route.
    ///
    /// On a match the captured parameters replace `request.route_params`;
    /// otherwise the request is left untouched.
    pub fn find(&self, request: &mut Request) -> Option<Route> {
        let method = request.method().parse::<Method>().ok();
        let mut captured = Vec::new();
        let mut node = &self.root;

        for segment in split_segments(request.path()) {
            node = match node.literals.get(segment.to_lowercase().as_str()) {
                Some(child) => child,
                None => {
                    let (name, child) = node.param.as_ref()?;
                    captured.push((name.clone(), segment.to_string()));
                    &**child
                }
            };
        }

        let route = method
            .and_then(|m| node.routes.get(&Some(m)))
            .or_else(|| node.routes.get(&None))?
            .clone();
        request.route_params = captured.into_iter().collect();
        Some(route)
    }

    /// All indexed routes, in no particular order.
    pub fn routes(&self) -> Vec<&Route> {
        let mut out = Vec::with_capacity(self.len);
        collect(&self.root, &mut out);
        out
    }
}

fn collect<'t>(node: &'t Node, out: &mut Vec<&'t Route>) {
    out.extend(node.routes.values());
    for child in node.literals.values() {
        collect(child, out);
    }
    if let Some((_, child)) = &node.param {
        collect(child, out);
    }
}
