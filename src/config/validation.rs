//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check every method string and path template
//! - Detect endpoints the route tree would refuse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SwitchyardConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::fmt;

use crate::config::schema::{RouteConfig, SwitchyardConfig};
use crate::http::Method;
use crate::routing::PathPattern;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted location, e.g. `endpoints[2].path`.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl fmt::Display) -> Self {
        Self {
            field: field.into(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validate a parsed configuration.
pub fn validate_config(config: &SwitchyardConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level {:?}", config.observability.log_level),
        ));
    }
    if config.dispatch.handler_timeout_ms == Some(0) {
        errors.push(ValidationError::new(
            "dispatch.handler_timeout_ms",
            "must be greater than zero",
        ));
    }

    check_routes("middleware", &config.middleware, &mut errors);
    check_routes("error_routes", &config.error_routes, &mut errors);
    check_routes("endpoints", &config.endpoints, &mut errors);
    check_endpoints(&config.endpoints, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_routes(section: &str, routes: &[RouteConfig], errors: &mut Vec<ValidationError>) {
    let mut names = HashSet::new();
    for (i, route) in routes.iter().enumerate() {
        if route.name.trim().is_empty() {
            errors.push(ValidationError::new(format!("{section}[{i}].name"), "must not be empty"));
        } else if !names.insert(route.name.as_str()) {
            errors.push(ValidationError::new(
                format!("{section}[{i}].name"),
                format!("duplicate route name {:?}", route.name),
            ));
        }
        if let Err(e) = Method::parse_scope(route.method.as_deref()) {
            errors.push(ValidationError::new(format!("{section}[{i}].method"), e));
        }
        if let Some(path) = &route.path {
            if let Err(e) = PathPattern::parse(path) {
                errors.push(ValidationError::new(format!("{section}[{i}].path"), e));
            }
        }
    }
}

fn check_endpoints(routes: &[RouteConfig], errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();
    for (i, route) in routes.iter().enumerate() {
        let Some(path) = &route.path else {
            errors.push(ValidationError::new(
                format!("endpoints[{i}].path"),
                "endpoints require a path",
            ));
            continue;
        };
        let Ok(pattern) = PathPattern::parse(path) else {
            continue;
        };
        if !pattern.is_deterministic() {
            errors.push(ValidationError::new(
                format!("endpoints[{i}].path"),
                "wildcards and optional groups are not allowed in endpoints",
            ));
            continue;
        }
        let Ok(method) = Method::parse_scope(route.method.as_deref()) else {
            continue;
        };
        if !seen.insert((method, pattern.segments().to_vec())) {
            errors.push(ValidationError::new(
                format!("endpoints[{i}]"),
                format!("duplicate endpoint {} {}", method.map_or("all", |m| m.as_str()), path),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RouteAction;

    fn route(name: &str, method: Option<&str>, path: Option<&str>) -> RouteConfig {
        RouteConfig {
            name: name.into(),
            method: method.map(Into::into),
            path: path.map(Into::into),
            action: RouteAction::Fail { message: "x".into() },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        let mut config = SwitchyardConfig::default();
        config.middleware.push(route("mw", None, Some("/api/*")));
        config.endpoints.push(route("show", Some("get"), Some("/users/:id")));
        config.endpoints.push(route("new", Some("get"), Some("/users/new")));
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = SwitchyardConfig::default();
        config.observability.log_level = "loud".into();
        config.middleware.push(route("mw", Some("fetch"), Some("/a/:")));
        config.endpoints.push(route("wild", Some("get"), Some("/a/*")));
        config.endpoints.push(route("nopath", None, None));
        config.endpoints.push(route("dup", Some("GET"), Some("/x/:id")));
        config.endpoints.push(route("dup2", Some("get"), Some("/X/:id/")));

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            [
                "observability.log_level",
                "middleware[0].method",
                "middleware[0].path",
                "endpoints[0].path",
                "endpoints[1].path",
                "endpoints[3]",
            ]
        );
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut config = SwitchyardConfig::default();
        config.error_routes.push(route("same", None, None));
        config.error_routes.push(route("same", None, None));
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "error_routes[1].name");
    }
}
