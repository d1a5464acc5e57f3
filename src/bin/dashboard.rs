use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use hostcheck::{
    dashboard::{DashboardState, serve_dashboard},
    storage::sqlite::SqliteStore,
    util::{get_dashboard_addr, get_database_path},
};
use tracing::{info, level_filters::LevelFilter, trace};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

/// Serve the stored check results over HTTP
#[derive(Debug, Clone, Parser)]
struct Args {
    /// Result database written by the worker
    #[arg(long)]
    database: Option<PathBuf>,

    /// Address to listen on
    #[arg(long)]
    addr: Option<SocketAddr>,
}

fn init() {
    let filter = filter::Targets::new().with_targets(vec![
        ("hostcheck", LevelFilter::DEBUG),
        ("hostcheck_dashboard", LevelFilter::TRACE),
        ("tower_http", LevelFilter::DEBUG),
    ]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init();
    let args = Args::parse();
    trace!("started with args: {args:?}");

    let database = args.database.unwrap_or_else(get_database_path);
    let store = SqliteStore::open(&database)
        .await
        .with_context(|| format!("cannot open result store {}", database.display()))?;
    info!("serving results from {}", store.path());

    let addr = args.addr.unwrap_or_else(get_dashboard_addr);
    serve_dashboard(addr, DashboardState::new(Arc::new(store))).await
}
