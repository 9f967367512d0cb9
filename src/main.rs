//! Command-line entry point for microhttp-server.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::error;

use microhttp_server::{HttpServer, ServerConfig};

/// A minimal persistent-connection HTTP/1.1 server.
#[derive(Debug, Parser)]
#[command(name = "microhttp-server", version, about)]
struct Args {
    /// Directory served and written by the /files/ route
    #[arg(long, env = "HTTP_DIRECTORY")]
    directory: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:4221", env = "HTTP_ADDR")]
    addr: SocketAddr,

    /// Seconds an idle keep-alive connection is held open
    #[arg(long = "idle-timeout", default_value = "5", env = "HTTP_IDLE_TIMEOUT")]
    idle_timeout_secs: u64,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        ServerConfig {
            addr: args.addr,
            directory: args.directory,
            idle_timeout: Duration::from_secs(args.idle_timeout_secs),
            ..ServerConfig::default()
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from(Args::parse());

    let result = match HttpServer::bind(config).await {
        Ok(server) => server.start().await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}
