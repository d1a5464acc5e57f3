//! Read-only dashboard over the result store
//!
//! Renders every stored status record, ordered by identifier. The dashboard
//! never writes to the store and makes no assumption about run boundaries:
//! what it shows is the store as of its last write.
//!
//! ## Endpoints
//!
//! - `GET /` - HTML table of all records
//! - `GET /api/v1/results` - All records as JSON
//! - `GET /api/v1/health` - Store health

pub mod error;
pub mod render;
pub mod routes;
pub mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::storage::ResultStore;

pub use error::{ApiError, ApiResult};
pub use types::{HealthResponse, ResultsResponse};

/// Shared state passed to all handlers
#[derive(Clone)]
pub struct DashboardState {
    pub store: Arc<dyn ResultStore>,
}

impl DashboardState {
    pub fn new(store: Arc<dyn ResultStore>) -> Self {
        Self { store }
    }
}

/// Build the dashboard router
pub fn router(state: DashboardState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(routes::index))
        .route("/api/v1/results", get(routes::list_results))
        .route("/api/v1/health", get(routes::health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Spawn the dashboard in a background task
///
/// Returns the address the server is listening on, which is useful when
/// binding to port 0.
pub async fn spawn_dashboard(bind_addr: SocketAddr, state: DashboardState) -> anyhow::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let addr = listener.local_addr()?;

    info!("dashboard listening on {}", addr);

    let app = router(state);
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("dashboard server error: {}", e);
        }
    });

    Ok(addr)
}

/// Serve the dashboard until the process is stopped
pub async fn serve_dashboard(bind_addr: SocketAddr, state: DashboardState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("dashboard listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state)).await?;
    Ok(())
}
