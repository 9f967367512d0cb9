//! HTTP server implementation for microhttp-server.
//!
//! This module holds everything past the wire reader: the response
//! builder, gzip negotiation, the fixed route table and its file
//! collaborators, the per-connection keep-alive loop, and the listener.

mod codec;
mod response;
mod config;
mod error;
mod files;
mod router;
mod connection;
mod http_server;

// Re-export public items
pub use codec::{compress, supports_encoding, GZIP};
pub use response::{HttpResponse, StatusCode};
pub use config::{ServerConfig, DEFAULT_PORT};
pub use error::Error;
pub use files::{DirectoryStore, FileError, FileStore};
pub use router::Router;
pub use connection::Connection;
pub use http_server::HttpServer;
