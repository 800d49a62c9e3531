//! Ephemeral two-party chat room server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tachibanashi-server -- --redis-url redis://localhost:6379
//! ```
//!
//! Without `--redis-url` the server keeps all room state in memory
//! (development mode; rooms do not survive a restart).

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use clap::Parser;

use tachibanashi::common::time::{Clock, SystemClock};
use tachibanashi::domain::RoomStore;
use tachibanashi::infrastructure::repository::{InMemoryRoomStore, RedisRoomStore};
use tachibanashi::logger::setup_logger;

#[derive(Debug, Parser)]
#[command(name = "tachibanashi-server", about = "Ephemeral two-party chat room server")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Redis connection URL; omit to use the in-memory store
    #[arg(long, env = "REDIS_URL")]
    redis_url: Option<String>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    let host: IpAddr = match args.host.parse() {
        Ok(host) => host,
        Err(e) => {
            tracing::error!("invalid --host '{}': {e}", args.host);
            std::process::exit(1);
        }
    };
    let addr = SocketAddr::from((host, args.port));

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store: Arc<dyn RoomStore> = match &args.redis_url {
        Some(url) => match RedisRoomStore::new(url).await {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::error!("failed to connect to Redis: {e}");
                std::process::exit(1);
            }
        },
        None => {
            tracing::warn!("no --redis-url given; using the in-memory store");
            Arc::new(InMemoryRoomStore::new(clock.clone()))
        }
    };

    // Run the server
    if let Err(e) = tachibanashi::run(store, clock, addr).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
