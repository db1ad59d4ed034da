//! Ordered index of live order identifiers.
//!
//! The index is the pagination source of truth: it lists every live order
//! id in insertion order and supports rank-range reads, so listing never
//! scans the whole keyspace.

use std::sync::Arc;

use crate::store::{KvStore, StoreResult};

/// Handle to the well-known order index structure in the store.
#[derive(Clone)]
pub struct OrderIndex {
    store: Arc<dyn KvStore>,
}

impl OrderIndex {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Append `id` at the end of the index.
    ///
    /// Not idempotent; the repository adds each id exactly once, on insert.
    pub async fn add(&self, id: u64) -> StoreResult<()> {
        self.store.index_append(id).await
    }

    /// Remove `id` from the index. Returns whether it was present.
    ///
    /// The repository only calls this after a successful existence check,
    /// so `false` signals index/record divergence, not a normal miss.
    pub async fn remove(&self, id: u64) -> StoreResult<bool> {
        self.store.index_remove(id).await
    }

    /// Identifiers at ranks `offset..offset+size`, in index order, plus
    /// whether further entries exist beyond the returned page.
    pub async fn range(&self, offset: u64, size: u64) -> StoreResult<(Vec<u64>, bool)> {
        self.store.index_range(offset, size).await
    }
}
