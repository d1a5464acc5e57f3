//! Dashboard handlers

use axum::{Json, extract::State, response::Html};

use super::{
    DashboardState,
    error::ApiResult,
    render::render_results,
    types::{HealthResponse, ResultsResponse},
};

/// GET /
///
/// HTML table of every stored record
pub async fn index(State(state): State<DashboardState>) -> ApiResult<Html<String>> {
    let records = state.store.read_all().await?;
    Ok(Html(render_results(&records)))
}

/// GET /api/v1/results
pub async fn list_results(State(state): State<DashboardState>) -> ApiResult<Json<ResultsResponse>> {
    let results = state.store.read_all().await?;
    let count = results.len();
    Ok(Json(ResultsResponse { results, count }))
}

/// GET /api/v1/health
pub async fn health_check(State(state): State<DashboardState>) -> ApiResult<Json<HealthResponse>> {
    let health = state.store.health_check().await?;

    Ok(Json(HealthResponse {
        status: if health.healthy { "ok" } else { "degraded" }.to_string(),
        message: health.message,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}
