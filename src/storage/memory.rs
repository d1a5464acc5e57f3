//! In-memory result store (no persistence)
//!
//! Useful for tests and for dry runs where nothing should touch disk.
//! Records live in a `BTreeMap` keyed by identifier, which gives both the
//! upsert and the ordering guarantees of the trait for free.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::backend::{HealthStatus, ResultStore};
use super::error::StorageResult;
use super::schema::StatusRecord;

/// In-memory result store
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<i64, StatusRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn write(&self, record: StatusRecord) -> StorageResult<()> {
        debug!("in-memory store: writing record {}", record.id);
        self.records.write().await.insert(record.id, record);
        Ok(())
    }

    async fn read_all(&self) -> StorageResult<Vec<StatusRecord>> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn max_id(&self) -> StorageResult<Option<i64>> {
        Ok(self.records.read().await.keys().next_back().copied())
    }

    async fn health_check(&self) -> StorageResult<HealthStatus> {
        Ok(HealthStatus {
            healthy: true,
            message: format!("In-memory store operational ({} records)", self.len().await),
        })
    }

    async fn close(&self) -> StorageResult<()> {
        debug!("closing in-memory store (no-op)");
        Ok(())
    }
}
