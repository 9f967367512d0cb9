//! A minimal HTTP/1.1 server with persistent connections.
//!
//! The crate is split into two layers:
//!
//! - [`parser`] reads requests incrementally off a buffered stream.
//! - [`server`] routes them, frames responses byte-exactly, negotiates gzip,
//!   and runs one keep-alive loop per accepted TCP connection.
//!
//! # Routes
//!
//! | Route              | Behaviour                                          |
//! |--------------------|----------------------------------------------------|
//! | `GET /`            | `200`, empty body                                  |
//! | `/echo/<text>`     | `200`, body is `<text>`, gzip if the client accepts |
//! | `/user-agent`      | `200`, body is the `User-Agent` header             |
//! | `GET /files/<n>`   | `200` with the file, `404` when absent             |
//! | `POST /files/<n>`  | `201` once written, `500` on failure               |
//! | anything else      | `404`                                              |
//!
//! # Examples
//!
//! ## Parsing a request
//!
//! ```
//! use microhttp_server::{parse_request, Method};
//!
//! # tokio_test_block(async {
//! let mut wire: &[u8] = b"GET /echo/abc HTTP/1.1\r\nHost: example.com\r\n\r\n";
//! let request = parse_request(&mut wire).await.unwrap().unwrap();
//! assert_eq!(request.method, Method::GET);
//! assert_eq!(request.path, "/echo/abc");
//! assert_eq!(request.get_header("host"), Some("example.com"));
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```
//!
//! ## Running a server
//!
//! ```no_run
//! use microhttp_server::{HttpServer, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), microhttp_server::ServerError> {
//!     let config = ServerConfig {
//!         directory: Some("/tmp/files".into()),
//!         ..ServerConfig::default()
//!     };
//!     HttpServer::bind(config).await?.start().await
//! }
//! ```

// Export the parser module
pub mod parser;

// Export the server module
pub mod server;

// Re-export commonly used items for convenience
pub use parser::{Error as ParserError, Headers, HttpRequest, Method, parse_request};
pub use server::{
    Error as ServerError, HttpResponse, HttpServer, Router, ServerConfig, StatusCode,
};
