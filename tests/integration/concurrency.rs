//! Concurrency tests for the runner
//!
//! These tests verify that:
//! - Parallel runs produce the same records, in the same order, as sequential runs
//! - Parallel probes overlap in time
//! - Identifiers stay unique

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use hostcheck::checks::PingCommand;
use hostcheck::config::HostConfig;
use hostcheck::storage::{MemoryStore, ResultStore};
use pretty_assertions::assert_eq;

use crate::helpers::*;

/// Ping stand-in that takes a second before replying
fn slow_ping() -> PingCommand {
    PingCommand::new(
        "sh",
        ["-c", "sleep 1; echo 64 bytes from {host}: icmp_seq=1"],
    )
}

fn hosts(count: usize) -> Vec<HostConfig> {
    (0..count)
        .map(|i| HostConfig {
            hostname: format!("host-{i}.example"),
            icmp: icmp(3),
            ..Default::default()
        })
        .collect()
}

#[tokio::test]
async fn test_parallel_run_matches_sequential_order() {
    let hosts = hosts(6);

    let sequential = Arc::new(MemoryStore::new());
    runner(sequential.clone(), Some(replying_ping()))
        .run(&hosts)
        .await
        .unwrap();

    let parallel = Arc::new(MemoryStore::new());
    runner(parallel.clone(), Some(replying_ping()))
        .with_concurrency(4)
        .run(&hosts)
        .await
        .unwrap();

    let key = |store_records: Vec<hostcheck::StatusRecord>| {
        store_records
            .into_iter()
            .map(|r| (r.id, r.hostname, r.checkname, r.status))
            .collect::<Vec<_>>()
    };

    assert_eq!(
        key(sequential.read_all().await.unwrap()),
        key(parallel.read_all().await.unwrap())
    );
}

#[tokio::test]
async fn test_parallel_probes_overlap() {
    let hosts = hosts(4);
    let store = Arc::new(MemoryStore::new());

    let start = Instant::now();
    let summary = runner(store.clone(), Some(slow_ping()))
        .with_concurrency(4)
        .run(&hosts)
        .await
        .unwrap();
    let elapsed = start.elapsed();

    assert_eq!(summary.ok, 4);
    assert!(elapsed < Duration::from_secs(3), "took {elapsed:?}");
}

#[tokio::test]
async fn test_parallel_ids_are_unique_and_dense() {
    let hosts = hosts(20);
    let store = Arc::new(MemoryStore::new());

    runner(store.clone(), Some(replying_ping()))
        .with_concurrency(8)
        .run(&hosts)
        .await
        .unwrap();

    let ids: HashSet<i64> = store
        .read_all()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, (0..20).collect::<HashSet<i64>>());
}

#[tokio::test]
async fn test_zero_concurrency_is_treated_as_one() {
    let store = Arc::new(MemoryStore::new());
    let summary = runner(store.clone(), Some(replying_ping()))
        .with_concurrency(0)
        .run(&hosts(2))
        .await
        .unwrap();

    assert_eq!(summary.total, 2);
}
