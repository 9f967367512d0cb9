//! Error types for the HTTP parser.

use thiserror::Error;

/// Errors that can occur while reading an HTTP request off the wire.
///
/// None of these are answered with an HTTP response: a request that cannot
/// be framed cannot be answered reliably on the same connection.
#[derive(Debug, Error)]
pub enum Error {
    /// The request line is not exactly `<method> <path> <version>`.
    #[error("Malformed request line: {0}")]
    MalformedRequestLine(String),

    /// The `Content-Length` header is not a non-negative integer.
    #[error("Invalid Content-Length: {0}")]
    InvalidContentLength(String),

    /// The stream ended before the blank line closing the header block.
    #[error("Stream ended inside the header block")]
    IncompleteHeaders,

    /// The stream ended before the declared body length arrived.
    #[error("Incomplete body: expected {expected} bytes, received {received}")]
    IncompleteBody { expected: usize, received: usize },

    /// I/O error while reading the header block.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
