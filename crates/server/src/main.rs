// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod delivery;
mod error;
mod live;
mod routes;
mod session;

#[cfg(test)]
mod tests;

use axum::Router;
use clap::Parser;
use freight_desk_api::LogTransport;
use freight_desk_persistence::Persistence;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::delivery::{ChannelQueue, run_delivery_worker};
use crate::live::LiveEventBroadcaster;
use crate::routes::build_router;

/// Freight Desk Server - HTTP server for the freight forwarding back-office
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// Load reference data and demo users into an empty database
    #[arg(long)]
    seed: bool,
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The persistence layer.
    pub persistence: Arc<Mutex<Persistence>>,
    /// Queue feeding the notification delivery worker.
    pub queue: Arc<ChannelQueue>,
    /// Live event fan-out for WebSocket clients.
    pub live: Arc<LiveEventBroadcaster>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Freight Desk Server");

    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    if args.seed {
        if persistence.seed_demo_data()? {
            info!("Loaded reference data and demo users");
        } else {
            info!("Database already populated, skipping seed");
        }
    }

    let persistence: Arc<Mutex<Persistence>> = Arc::new(Mutex::new(persistence));
    let (queue, rx) = ChannelQueue::new();
    tokio::spawn(run_delivery_worker(Arc::clone(&persistence), LogTransport, rx));

    let app_state: AppState = AppState {
        persistence,
        queue: Arc::new(queue),
        live: Arc::new(LiveEventBroadcaster::new()),
    };

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
