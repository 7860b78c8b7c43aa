//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → SwitchyardConfig (validated, immutable)
//!     → host::build_app wires routes from it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; wiring happens once, before dispatch
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{DispatchConfig, LogFormat, ObservabilityConfig, RouteAction, RouteConfig, SwitchyardConfig};
pub use validation::{validate_config, ValidationError};
