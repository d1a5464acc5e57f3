//! Identifier allocation for status records

use std::sync::atomic::{AtomicI64, Ordering};

use tracing::debug;

use crate::config::IdPolicy;
use crate::storage::{ResultStore, StorageResult};

/// Monotonically increasing record identifier
///
/// Backed by an atomic so concurrent callers never receive the same value.
#[derive(Debug)]
pub struct IdAllocator {
    next: AtomicI64,
}

impl IdAllocator {
    pub fn starting_at(first: i64) -> Self {
        Self {
            next: AtomicI64::new(first),
        }
    }

    /// Allocator for a new run against `store`
    ///
    /// With [`IdPolicy::Restart`] every run starts at 0, so rows from an
    /// earlier run whose identifiers collide get replaced. With
    /// [`IdPolicy::Continue`] the run starts after the largest stored
    /// identifier and history accumulates.
    pub async fn for_policy(policy: IdPolicy, store: &dyn ResultStore) -> StorageResult<Self> {
        let first = match policy {
            IdPolicy::Restart => 0,
            IdPolicy::Continue => store.max_id().await?.map_or(0, |max| max + 1),
        };
        debug!("allocating identifiers from {first} ({policy:?})");
        Ok(Self::starting_at(first))
    }

    /// Hand out the current identifier and advance
    pub fn next_id(&self) -> i64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::starting_at(0)
    }
}
