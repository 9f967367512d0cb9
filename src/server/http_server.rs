//! HTTP server implementation.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use log::{debug, error, info};
use tokio::net::{TcpListener, TcpStream};
use tokio::signal;
use tokio::task::JoinSet;

use crate::server::config::ServerConfig;
use crate::server::connection::Connection;
use crate::server::error::Error;
use crate::server::router::Router;

/// How long in-flight connections get to finish once shutdown starts.
const SHUTDOWN_GRACE: tokio::time::Duration = tokio::time::Duration::from_secs(30);

/// An HTTP server bound to a listening socket.
///
/// The socket is owned by this value and released when it is dropped or
/// when serving finishes, so several servers can run side by side.
pub struct HttpServer {
    /// The server configuration.
    pub config: ServerConfig,
    listener: TcpListener,
    router: Arc<Router>,
}

impl HttpServer {
    /// Bind a listener for the given configuration.
    ///
    /// Port 0 picks a free port; see [`HttpServer::local_addr`].
    pub async fn bind(config: ServerConfig) -> Result<Self, Error> {
        let router = Router::from_config(&config);
        Self::bind_with_router(config, router).await
    }

    /// Bind a listener that dispatches through a caller-supplied router.
    pub async fn bind_with_router(config: ServerConfig, router: Router) -> Result<Self, Error> {
        config.validate()?;
        let listener = TcpListener::bind(config.addr).await?;

        Ok(Self {
            config,
            listener,
            router: Arc::new(router),
        })
    }

    /// The address the listener is actually bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, Error> {
        Ok(self.listener.local_addr()?)
    }

    /// Log the listening address and route table.
    fn display_server_info(&self) -> Result<(), Error> {
        info!("Server listening on http://{addr}", addr = self.local_addr()?);
        match (&self.config.directory, self.router.has_storage()) {
            (Some(dir), true) => info!("Serving files from {}", dir.display()),
            (None, true) => info!("Serving files from a custom store"),
            (_, false) => info!("No storage directory configured, /files/ is disabled"),
        }

        info!("Registered endpoints:");
        info!("  GET /");
        info!("  GET /echo/{{message}}");
        info!("  GET /user-agent");
        info!("  GET, POST /files/{{name}}");

        Ok(())
    }

    /// Spawn a worker for a newly accepted connection.
    fn handle_new_connection(&self, socket: TcpStream, addr: SocketAddr, tasks: &mut JoinSet<()>) {
        debug!("Accepted connection from {addr}");
        let connection = Connection::new(socket, self.router.clone(), &self.config);

        tasks.spawn(async move {
            match connection.run().await {
                Ok(served) => debug!("Connection from {addr} closed after {served} responses"),
                Err(e) => error!("Error handling connection from {addr}: {e}"),
            }
        });
    }

    /// Handle connection errors.
    async fn handle_connection_error(e: std::io::Error) {
        error!("Error accepting connection: {e}");

        // Wait a bit before retrying
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
    }

    /// Perform graceful shutdown.
    async fn perform_shutdown(tasks: &mut JoinSet<()>) {
        // Wait for all tasks to complete (with timeout)
        info!("Waiting for {len} active connections to complete...", len = tasks.len());
        let drained = tokio::time::timeout(SHUTDOWN_GRACE, async {
            while let Some(res) = tasks.join_next().await {
                if let Err(e) = res {
                    error!("Task failed during shutdown: {e}");
                }
            }
        })
        .await;

        if drained.is_err() {
            info!("Grace period elapsed, aborting {len} connections", len = tasks.len());
            tasks.abort_all();
        }

        info!("Server shutdown complete");
    }

    /// Serve until Ctrl+C is received.
    pub async fn start(self) -> Result<(), Error> {
        self.serve_until(async {
            match signal::ctrl_c().await {
                Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown"),
                Err(e) => error!("Error setting up Ctrl+C handler: {e}"),
            }
        })
        .await
    }

    /// Accept connections until `shutdown` resolves.
    pub async fn serve_until<F>(self, shutdown: F) -> Result<(), Error>
    where
        F: Future<Output = ()>,
    {
        self.display_server_info()?;

        // Use JoinSet to keep track of all spawned tasks
        let mut tasks = JoinSet::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                // Check for shutdown signal
                _ = &mut shutdown => {
                    info!("Shutting down server...");
                    break;
                }

                // Accept new connections
                accept_result = self.listener.accept() => {
                    match accept_result {
                        Ok((socket, addr)) => self.handle_new_connection(socket, addr, &mut tasks),
                        Err(e) => Self::handle_connection_error(e).await,
                    }
                }

                // Reap finished workers
                Some(res) = tasks.join_next(), if !tasks.is_empty() => {
                    if let Err(e) = res {
                        error!("Connection task failed: {e}");
                    }
                }
            }
        }

        // Stop accepting before draining
        drop(self.listener);

        // Perform graceful shutdown
        Self::perform_shutdown(&mut tasks).await;

        Ok(())
    }
}
