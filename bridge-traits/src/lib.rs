//! # Host Bridge Traits
//!
//! Platform abstraction traits the catalog core depends on but does not
//! implement itself.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - Async HTTP request/response used by the
//!   metadata enrichment client
//!
//! Desktop hosts get a reqwest-backed implementation from `bridge-desktop`.
//! Tests mock the trait with `mockall`.
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! convert their platform-specific errors into it and keep the message
//! actionable (URL, status, cause).

pub mod error;
pub mod http;

pub use error::BridgeError;
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
