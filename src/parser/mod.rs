//! HTTP request parsing module.
//!
//! This module reads HTTP/1.1 requests incrementally from a buffered byte
//! stream. It knows nothing about routing.

mod request;
mod headers;
mod method;
mod error;
mod tests;

// Re-export public items
pub use request::HttpRequest;
pub use headers::Headers;
pub use method::Method;
pub use error::Error;

// Re-export the parse_request function
pub use request::parse_request;
