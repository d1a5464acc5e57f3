//! Response types for the dashboard JSON endpoints

use serde::{Deserialize, Serialize};

use crate::storage::StatusRecord;

/// Response for GET /api/v1/health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "ok" when the store answers, "degraded" otherwise
    pub status: String,
    pub message: String,
    pub timestamp: String,
}

/// Response for GET /api/v1/results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsResponse {
    /// All records, ordered by identifier ascending
    pub results: Vec<StatusRecord>,
    pub count: usize,
}
