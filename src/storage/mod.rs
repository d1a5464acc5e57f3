//! Result store for status records
//!
//! This module provides a trait-based abstraction over the durable keyed
//! collection that holds every [`StatusRecord`] written by the runner.
//!
//! ## Design
//!
//! - **Trait-based**: `ResultStore` allows swapping implementations
//! - **Upsert by identifier**: a write never duplicates an identifier
//! - **Ordered reads**: `read_all` returns records by identifier ascending
//!
//! ## Backends
//!
//! - **SQLite** (default): the `Monitoring` table in a local database file
//! - **In-Memory**: No persistence, for tests and dry runs
//!
//! ## Usage
//!
//! ```no_run
//! use hostcheck::config::StorageConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = hostcheck::storage::open(&StorageConfig::default()).await?;
//!     let records = store.read_all().await?;
//!     println!("{} records", records.len());
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod error;
pub mod memory;
pub mod schema;
#[cfg(feature = "storage-sqlite")]
pub mod sqlite;

pub use backend::{HealthStatus, ResultStore};
pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use schema::{CheckStatus, StatusRecord};

use crate::config::StorageConfig;

/// Open the store described by `config`
///
/// Creates the backing schema if it is missing. Opening the same location
/// twice is harmless.
pub async fn open(config: &StorageConfig) -> StorageResult<Box<dyn ResultStore>> {
    match config {
        StorageConfig::None => Ok(Box::new(MemoryStore::new())),
        #[cfg(feature = "storage-sqlite")]
        StorageConfig::Sqlite { path } => Ok(Box::new(sqlite::SqliteStore::open(path).await?)),
        #[cfg(not(feature = "storage-sqlite"))]
        StorageConfig::Sqlite { .. } => Err(StorageError::Open(
            "sqlite support is not compiled in (enable the storage-sqlite feature)".to_string(),
        )),
    }
}
