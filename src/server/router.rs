//! Request routing.

use std::io;
use std::sync::Arc;

use log::{debug, warn};

use crate::parser::{HttpRequest, Method};
use crate::server::codec;
use crate::server::config::ServerConfig;
use crate::server::files::{DirectoryStore, FileError, FileStore};
use crate::server::response::{HttpResponse, StatusCode};

const ECHO_PREFIX: &str = "/echo/";
const FILES_PREFIX: &str = "/files/";

/// Body compressor applied when the client accepts gzip.
type Compressor = fn(&[u8]) -> io::Result<Vec<u8>>;

/// Maps requests onto the fixed route table.
///
/// Dispatch depends only on the request and the storage collaborator fixed
/// at construction.
#[derive(Clone)]
pub struct Router {
    store: Option<Arc<dyn FileStore>>,
    compressor: Compressor,
}

impl Router {
    /// Create a router with an explicit file collaborator, or none.
    pub fn new(store: Option<Arc<dyn FileStore>>) -> Self {
        Self {
            store,
            compressor: codec::compress,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_compressor(mut self, compressor: Compressor) -> Self {
        self.compressor = compressor;
        self
    }

    /// Create a router backed by the configured storage directory, if any.
    pub fn from_config(config: &ServerConfig) -> Self {
        let store = config
            .directory
            .as_ref()
            .map(|dir| Arc::new(DirectoryStore::new(dir)) as Arc<dyn FileStore>);
        Self::new(store)
    }

    pub fn has_storage(&self) -> bool {
        self.store.is_some()
    }

    /// Produce the response for `request`. Never fails.
    pub fn dispatch(&self, request: &HttpRequest) -> HttpResponse {
        let path = request.path.as_str();

        if path == "/" {
            return HttpResponse::new(StatusCode::Ok);
        }

        if let Some(message) = path.strip_prefix(ECHO_PREFIX) {
            return self.echo(request, message);
        }

        if path == "/user-agent" {
            let user_agent = request.get_header("User-Agent").unwrap_or_default();
            return HttpResponse::new(StatusCode::Ok)
                .with_content_type("text/plain")
                .with_body_string(user_agent);
        }

        if let Some(name) = path.strip_prefix(FILES_PREFIX) {
            match request.method {
                Method::GET => return self.read_file(name),
                Method::POST => return self.write_file(name, &request.body),
                _ => {}
            }
        }

        debug!("No route for {} {}", request.method, path);
        HttpResponse::new(StatusCode::NotFound)
    }

    fn echo(&self, request: &HttpRequest, message: &str) -> HttpResponse {
        let mut response = HttpResponse::new(StatusCode::Ok).with_content_type("text/plain");

        if codec::supports_encoding(&request.accepted_encodings(), codec::GZIP) {
            match (self.compressor)(message.as_bytes()) {
                Ok(compressed) => {
                    response.set_header("Content-Encoding", codec::GZIP);
                    response.set_body(compressed);
                    return response;
                }
                Err(e) => warn!("gzip compression failed, sending identity body: {e}"),
            }
        }

        response.set_body(message.as_bytes());
        response
    }

    fn read_file(&self, name: &str) -> HttpResponse {
        let Some(store) = &self.store else {
            return HttpResponse::new(StatusCode::NotFound);
        };

        match store.read(name) {
            Ok(contents) => HttpResponse::new(StatusCode::Ok)
                .with_content_type("application/octet-stream")
                .with_body_bytes(contents),
            Err(FileError::NotFound(_)) => HttpResponse::new(StatusCode::NotFound),
            Err(e) => {
                warn!("Failed to read file {name}: {e}");
                HttpResponse::new(StatusCode::NotFound)
            }
        }
    }

    fn write_file(&self, name: &str, contents: &[u8]) -> HttpResponse {
        let Some(store) = &self.store else {
            warn!("POST to /files/{name} with no storage directory configured");
            return HttpResponse::new(StatusCode::InternalServerError);
        };

        match store.write(name, contents) {
            Ok(()) => HttpResponse::new(StatusCode::Created),
            Err(e) => {
                warn!("Failed to write file {name}: {e}");
                HttpResponse::new(StatusCode::InternalServerError)
            }
        }
    }
}
