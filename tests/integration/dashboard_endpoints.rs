//! Integration tests for the dashboard endpoints
//!
//! These tests verify that:
//! - The HTML page lists every record in identifier order
//! - The JSON endpoints mirror the store
//! - Storage failures surface as 500 responses

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use hostcheck::dashboard::{DashboardState, spawn_dashboard};
use hostcheck::storage::{
    HealthStatus, MemoryStore, ResultStore, StorageError, StorageResult,
};
use hostcheck::{CheckStatus, StatusRecord};
use serde_json::Value;

/// Store whose every operation fails
struct BrokenStore;

#[async_trait]
impl ResultStore for BrokenStore {
    async fn write(&self, _record: StatusRecord) -> StorageResult<()> {
        Err(StorageError::Query("database is locked".to_string()))
    }

    async fn read_all(&self) -> StorageResult<Vec<StatusRecord>> {
        Err(StorageError::Query("database is locked".to_string()))
    }

    async fn max_id(&self) -> StorageResult<Option<i64>> {
        Err(StorageError::Query("database is locked".to_string()))
    }

    async fn health_check(&self) -> StorageResult<HealthStatus> {
        Err(StorageError::Open("pool closed".to_string()))
    }

    async fn close(&self) -> StorageResult<()> {
        Ok(())
    }
}

async fn spawn_test_dashboard(store: Arc<dyn ResultStore>) -> SocketAddr {
    spawn_dashboard("127.0.0.1:0".parse().unwrap(), DashboardState::new(store))
        .await
        .unwrap()
}

async fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    // written out of order on purpose
    store
        .write(StatusRecord::now(2, "db.example", "tcp", false))
        .await
        .unwrap();
    store
        .write(StatusRecord::now(0, "web.example", "icmp", true))
        .await
        .unwrap();
    store
        .write(StatusRecord::now(1, "web.example", "http", true))
        .await
        .unwrap();
    store
}

#[tokio::test]
async fn test_index_lists_records_in_id_order() {
    let addr = spawn_test_dashboard(seeded_store().await).await;

    let response = reqwest::get(format!("http://{addr}/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/html"), "got {content_type}");

    let body = response.text().await.unwrap();
    let icmp = body.find(">icmp<").unwrap();
    let http = body.find(">http<").unwrap();
    let tcp = body.find(">tcp<").unwrap();
    assert!(icmp < http && http < tcp);
    assert!(body.contains("class=\"critical\">CRITICAL<"));
    assert!(body.contains("class=\"ok\">OK<"));
}

#[tokio::test]
async fn test_index_with_empty_store() {
    let addr = spawn_test_dashboard(Arc::new(MemoryStore::new())).await;

    let response = reqwest::get(format!("http://{addr}/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("No results recorded yet."));
}

#[tokio::test]
async fn test_index_escapes_hostnames() {
    let store = Arc::new(MemoryStore::new());
    store
        .write(StatusRecord::now(0, "<script>alert(1)</script>", "icmp", true))
        .await
        .unwrap();
    let addr = spawn_test_dashboard(store).await;

    let body = reqwest::get(format!("http://{addr}/"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(!body.contains("<script>"));
    assert!(body.contains("&lt;script&gt;"));
}

#[tokio::test]
async fn test_results_endpoint() {
    let addr = spawn_test_dashboard(seeded_store().await).await;

    let response = reqwest::get(format!("http://{addr}/api/v1/results"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json: Value = serde_json::from_str(&response.text().await.unwrap()).unwrap();
    assert_eq!(json["count"], 3);

    let results = json["results"].as_array().unwrap();
    let ids: Vec<i64> = results.iter().map(|r| r["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![0, 1, 2]);
    assert_eq!(results[0]["hostname"], "web.example");
    assert_eq!(results[0]["status"], "OK");
    assert_eq!(results[2]["status"], "CRITICAL");

    // timestamps use the stored text format
    let timestamp = results[0]["timestamp"].as_str().unwrap();
    assert_eq!(timestamp.len(), "2024-01-01 00:00:00".len());
}

#[tokio::test]
async fn test_results_round_trip_into_records() {
    let addr = spawn_test_dashboard(seeded_store().await).await;

    let body = reqwest::get(format!("http://{addr}/api/v1/results"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let response: hostcheck::dashboard::ResultsResponse = serde_json::from_str(&body).unwrap();

    assert_eq!(response.count, response.results.len());
    assert_eq!(response.results[1].checkname, "http");
    assert_eq!(response.results[2].status, CheckStatus::Critical);
}

#[tokio::test]
async fn test_health_endpoint() {
    let addr = spawn_test_dashboard(Arc::new(MemoryStore::new())).await;

    let response = reqwest::get(format!("http://{addr}/api/v1/health"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json: Value = serde_json::from_str(&response.text().await.unwrap()).unwrap();
    assert_eq!(json["status"], "ok");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_storage_failure_returns_500() {
    let addr = spawn_test_dashboard(Arc::new(BrokenStore)).await;

    for endpoint in ["/", "/api/v1/results", "/api/v1/health"] {
        let response = reqwest::get(format!("http://{addr}{endpoint}"))
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::INTERNAL_SERVER_ERROR,
            "endpoint {endpoint}"
        );

        let json: Value = serde_json::from_str(&response.text().await.unwrap()).unwrap();
        assert!(json["error"].is_string());
    }
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let addr = spawn_test_dashboard(Arc::new(MemoryStore::new())).await;

    let response = reqwest::get(format!("http://{addr}/api/v1/metrics"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
