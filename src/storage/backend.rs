//! Result store trait definition
//!
//! This module defines the `ResultStore` trait that every persistence
//! backend implements.

use async_trait::async_trait;

use super::error::StorageResult;
use super::schema::StatusRecord;

/// Health status of the result store
#[derive(Debug, Clone)]
pub struct HealthStatus {
    /// Is the store operational?
    pub healthy: bool,

    /// Human-readable status message
    pub message: String,
}

/// Trait for status record stores
///
/// ## Contract
///
/// - `write` is an upsert keyed by [`StatusRecord::id`]: writing a record
///   whose identifier already exists replaces the stored fields and never
///   fails because of the duplicate.
/// - `read_all` returns every record ordered by identifier ascending,
///   regardless of the order in which they were written.
///
/// ## Thread Safety
///
/// Implementations must be `Send + Sync`. Callers that write from several
/// tasks at once must serialize writes themselves unless the backend says
/// otherwise; the runner funnels all writes through one consumer.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Insert or replace a record by identifier
    async fn write(&self, record: StatusRecord) -> StorageResult<()>;

    /// All records, ordered by identifier ascending
    async fn read_all(&self) -> StorageResult<Vec<StatusRecord>>;

    /// Largest identifier currently stored, if any
    async fn max_id(&self) -> StorageResult<Option<i64>>;

    /// Check store health
    ///
    /// Performs a lightweight operation to verify the store is reachable.
    async fn health_check(&self) -> StorageResult<HealthStatus>;

    /// Close the store and release resources
    async fn close(&self) -> StorageResult<()>;
}
