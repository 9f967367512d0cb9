//! Per-connection request/response loop.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, error};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::time::Instant;

use crate::parser::{parse_request, HttpRequest};
use crate::server::config::ServerConfig;
use crate::server::error::Error;
use crate::server::response::{HttpResponse, StatusCode};
use crate::server::router::Router;

/// Where a connection is in its request/response cycle.
#[derive(Debug)]
enum State {
    /// Waiting (up to the idle deadline) for the next request line.
    AwaitingRequest,
    /// A request has been parsed and is being routed.
    Dispatching(HttpRequest),
    /// A response is ready to be written.
    Responding(HttpResponse),
    /// The last response went out and the client wants to keep going.
    Idle,
    /// Terminal state. The stream is released on the way out.
    Closed,
}

/// One client connection driven through [`State`] until it closes.
///
/// Requests are handled strictly one at a time.
pub struct Connection<S> {
    stream: BufReader<S>,
    router: Arc<Router>,
    idle_timeout: Duration,
    last_activity: Instant,
    keep_alive: bool,
    served: usize,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wrap an accepted stream.
    pub fn new(stream: S, router: Arc<Router>, config: &ServerConfig) -> Self {
        Self {
            stream: BufReader::with_capacity(config.read_buffer_size, stream),
            router,
            idle_timeout: config.idle_timeout,
            last_activity: Instant::now(),
            keep_alive: true,
            served: 0,
        }
    }

    /// Serve requests until the client closes, goes idle, asks for
    /// `Connection: close`, or sends something unparseable.
    ///
    /// Returns the number of responses written. Only a failed write is
    /// reported as an error. The stream is shut down on every path.
    pub async fn run(mut self) -> Result<usize, Error> {
        let mut state = State::AwaitingRequest;

        let result = loop {
            state = match state {
                State::AwaitingRequest => self.await_request().await,
                State::Dispatching(request) => self.dispatch(request).await,
                State::Responding(response) => match self.respond(&response).await {
                    Ok(()) if self.keep_alive => State::Idle,
                    Ok(()) => State::Closed,
                    Err(e) => {
                        error!("Failed to write response: {e}");
                        break Err(Error::IoError(e));
                    }
                },
                State::Idle => State::AwaitingRequest,
                State::Closed => break Ok(self.served),
            };
        };

        self.close().await;
        result
    }

    async fn await_request(&mut self) -> State {
        let deadline = self.last_activity + self.idle_timeout;

        match tokio::time::timeout_at(deadline, parse_request(&mut self.stream)).await {
            Ok(Ok(Some(request))) => {
                debug!("{} {} {}", request.method, request.path, request.version);
                self.keep_alive = request.keep_alive();
                State::Dispatching(request)
            }
            Ok(Ok(None)) => {
                debug!("Client closed connection");
                State::Closed
            }
            Ok(Err(e)) => {
                debug!("Dropping connection: {e}");
                State::Closed
            }
            Err(_) => {
                debug!("Connection idle for {:?}, closing", self.idle_timeout);
                State::Closed
            }
        }
    }

    async fn dispatch(&mut self, request: HttpRequest) -> State {
        let router = self.router.clone();

        // File collaborators are blocking
        let response = match tokio::task::spawn_blocking(move || router.dispatch(&request)).await {
            Ok(response) => response,
            Err(e) => {
                error!("Request handler failed: {e}");
                HttpResponse::new(StatusCode::InternalServerError)
            }
        };

        State::Responding(response)
    }

    async fn respond(&mut self, response: &HttpResponse) -> std::io::Result<()> {
        let socket = self.stream.get_mut();
        socket.write_all(&response.to_bytes()).await?;
        socket.flush().await?;

        self.served += 1;
        self.last_activity = Instant::now();
        debug!("Sent {} ({} body bytes)", response.status.as_u16(), response.body().len());
        Ok(())
    }

    async fn close(mut self) {
        if let Err(e) = self.stream.get_mut().shutdown().await {
            debug!("Error shutting down connection: {e}");
        }
    }
}
