//! Configuration schema definitions.
//!
//! This module defines the wiring file read by the `switchyard` host.
//! All types derive Serde traits for deserialization from TOML.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dispatch::ErrorPolicy;
use crate::http::Redaction;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SwitchyardConfig {
    /// Dispatcher behavior.
    pub dispatch: DispatchConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,

    /// Sensitive headers and body keys masked when rendering.
    pub redaction: Redaction,

    /// Regular routes, appended in order before the endpoints.
    pub middleware: Vec<RouteConfig>,

    /// Deterministic routes indexed by the router.
    pub endpoints: Vec<RouteConfig>,

    /// Error routes, appended in order.
    pub error_routes: Vec<RouteConfig>,
}

/// Dispatcher configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DispatchConfig {
    /// Outcome once error mode has been entered.
    pub error_policy: ErrorPolicy,

    /// Deadline applied to every configured handler, in milliseconds.
    pub handler_timeout_ms: Option<u64>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

/// One configured route.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Route identifier for logging.
    pub name: String,

    /// Method scope; unset or `all` is unconstrained.
    pub method: Option<String>,

    /// Path template scope.
    pub path: Option<String>,

    /// Built-in behavior to run.
    pub action: RouteAction,
}

/// Built-in handler behaviors available to configured routes.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RouteAction {
    /// Write a status, headers and optional JSON body, then end the response.
    Respond {
        #[serde(default = "default_status")]
        status: u16,
        #[serde(default)]
        headers: BTreeMap<String, String>,
        #[serde(default)]
        body: Option<Value>,
        /// Add the captured route parameters to the body under `params`.
        #[serde(default)]
        echo_params: bool,
    },

    /// Set a response header.
    SetHeader { name: String, value: String },

    /// Fail with a message.
    Fail { message: String },

    /// Write the current error into the response body.
    RenderError {
        #[serde(default = "default_error_status")]
        status: u16,
    },

    /// Wait before continuing.
    Delay { ms: u64 },
}

fn default_status() -> u16 {
    200
}

fn default_error_status() -> u16 {
    500
}
