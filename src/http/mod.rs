//! Request/response value objects handed to routes.
//!
//! # Data Flow
//! ```text
//! Host input (RequestOptions or Request)
//!     → request.rs (normalize method/path, snapshot original path)
//!     → routes mutate headers.rs / body.rs state in place
//!     → response.rs (status, headers, body, ended flag)
//!     → redact.rs (masked rendering for logs and the CLI)
//! ```

pub mod body;
pub mod headers;
pub mod method;
pub mod redact;
pub mod request;
pub mod response;

pub use body::{Body, BodyClosed, BodySender, BodyStream};
pub use headers::Headers;
pub use method::Method;
pub use redact::{Redaction, REDACTED};
pub use request::{Request, RequestOptions};
pub use response::Response;
