//! Integration tests for SQLite persistence
//!
//! These tests verify that:
//! - Runs persist their records to the SQLite store
//! - Restarting identifiers at 0 overwrites colliding rows of earlier runs
//! - Continuing identifiers keeps every earlier row
//! - Data survives reopening the store

use std::sync::Arc;

use hostcheck::config::{HostConfig, IdPolicy, StorageConfig};
use hostcheck::storage::{self, ResultStore, sqlite::SqliteStore};
use hostcheck::{CheckRunner, CheckStatus, RunContext, StatusRecord};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

use crate::helpers::*;

fn icmp_hosts(names: &[&str]) -> Vec<HostConfig> {
    names
        .iter()
        .map(|name| HostConfig {
            hostname: name.to_string(),
            icmp: icmp(1),
            ..Default::default()
        })
        .collect()
}

async fn run_once(
    store: Arc<dyn ResultStore>,
    policy: IdPolicy,
    hosts: &[HostConfig],
    ping: hostcheck::checks::PingCommand,
) {
    let ctx = RunContext::prepare(store, policy, Some(ping)).await.unwrap();
    CheckRunner::new(ctx).run(hosts).await.unwrap();
}

#[tokio::test]
async fn test_run_persists_to_sqlite() {
    let temp_dir = tempdir().unwrap();
    let db_path = temp_dir.path().join("results.db");

    let store: Arc<dyn ResultStore> = Arc::new(SqliteStore::open(&db_path).await.unwrap());
    run_once(
        store.clone(),
        IdPolicy::Continue,
        &icmp_hosts(&["a.example", "b.example"]),
        replying_ping(),
    )
    .await;
    store.close().await.unwrap();

    let reopened = SqliteStore::open(&db_path).await.unwrap();
    let records = reopened.read_all().await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, 0);
    assert_eq!(records[0].hostname, "a.example");
    assert_eq!(records[0].checkname, "icmp");
    assert_eq!(records[0].status, CheckStatus::Ok);
    assert_eq!(records[1].id, 1);
    assert_eq!(records[1].hostname, "b.example");
}

#[tokio::test]
async fn test_restart_policy_overwrites_previous_run() {
    let temp_dir = tempdir().unwrap();
    let store: Arc<dyn ResultStore> = Arc::new(
        SqliteStore::open(temp_dir.path().join("results.db"))
            .await
            .unwrap(),
    );

    run_once(
        store.clone(),
        IdPolicy::Restart,
        &icmp_hosts(&["a.example", "b.example", "c.example"]),
        replying_ping(),
    )
    .await;

    // second run is shorter and fails: ids 0 and 1 collide, id 2 survives
    run_once(
        store.clone(),
        IdPolicy::Restart,
        &icmp_hosts(&["x.example", "y.example"]),
        silent_ping(),
    )
    .await;

    let records = store.read_all().await.unwrap();
    let rows: Vec<(i64, String, CheckStatus)> = records
        .into_iter()
        .map(|r| (r.id, r.hostname, r.status))
        .collect();
    assert_eq!(
        rows,
        vec![
            (0, "x.example".to_string(), CheckStatus::Critical),
            (1, "y.example".to_string(), CheckStatus::Critical),
            (2, "c.example".to_string(), CheckStatus::Ok),
        ]
    );
}

#[tokio::test]
async fn test_continue_policy_accumulates_history() {
    let temp_dir = tempdir().unwrap();
    let store: Arc<dyn ResultStore> = Arc::new(
        SqliteStore::open(temp_dir.path().join("results.db"))
            .await
            .unwrap(),
    );

    let hosts = icmp_hosts(&["a.example", "b.example"]);
    run_once(store.clone(), IdPolicy::Continue, &hosts, replying_ping()).await;
    run_once(store.clone(), IdPolicy::Continue, &hosts, silent_ping()).await;

    let records = store.read_all().await.unwrap();
    let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![0, 1, 2, 3]);

    let statuses: Vec<CheckStatus> = records.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![
            CheckStatus::Ok,
            CheckStatus::Ok,
            CheckStatus::Critical,
            CheckStatus::Critical
        ]
    );
}

#[tokio::test]
async fn test_open_through_storage_config() {
    let temp_dir = tempdir().unwrap();
    let config = StorageConfig::Sqlite {
        path: temp_dir.path().join("configured.db"),
    };

    let store = storage::open(&config).await.unwrap();
    store
        .write(StatusRecord::now(5, "example.com", "http", true))
        .await
        .unwrap();

    assert_eq!(store.max_id().await.unwrap(), Some(5));
    assert!(temp_dir.path().join("configured.db").exists());
}

#[tokio::test]
async fn test_in_memory_storage_config() {
    let store = storage::open(&StorageConfig::None).await.unwrap();
    assert!(store.read_all().await.unwrap().is_empty());
    assert!(store.health_check().await.unwrap().healthy);
}

#[tokio::test]
async fn test_records_written_out_of_order_read_back_sorted() {
    let temp_dir = tempdir().unwrap();
    let store = SqliteStore::open(temp_dir.path().join("results.db"))
        .await
        .unwrap();

    for id in [9, 3, 11, 0, 4] {
        store
            .write(StatusRecord::now(id, "host", "tcp", id % 2 == 0))
            .await
            .unwrap();
    }

    let ids: Vec<i64> = store.read_all().await.unwrap().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![0, 3, 4, 9, 11]);
}
