//! Server configuration.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::server::error::Error;

/// Port the server listens on unless told otherwise.
pub const DEFAULT_PORT: u16 = 4221;

/// HTTP server configuration.
///
/// Read-only once the server is bound; every connection sees the same values.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The address to bind to.
    pub addr: SocketAddr,
    /// Root directory for the `/files/` route, if file storage is enabled.
    pub directory: Option<PathBuf>,
    /// How long a connection may sit idle waiting for its next request.
    pub idle_timeout: Duration,
    /// The read buffer size.
    pub read_buffer_size: usize,
}

impl ServerConfig {
    /// Reject values the connection loop cannot work with.
    pub fn validate(&self) -> Result<(), Error> {
        if self.idle_timeout.is_zero() {
            return Err(Error::InvalidConfig("idle timeout must be non-zero".to_string()));
        }
        if self.read_buffer_size == 0 {
            return Err(Error::InvalidConfig("read buffer size must be non-zero".to_string()));
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            directory: None,
            idle_timeout: Duration::from_secs(5),
            read_buffer_size: 8192,
        }
    }
}
