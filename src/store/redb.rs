//! redb-backed key-value store.
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `order_records` | `order:{id}` | record bytes | One record per order |
//! | `order_index` | rank sequence | `order_id` | Ordered index (insertion order) |
//! | `order_index_rank` | `order_id` | rank sequence | Reverse lookup for removal |
//! | `counters` | `()` | `u64` | Monotonic rank sequence |
//!
//! Rank sequences only ever grow, so iterating `order_index` in key order
//! yields identifiers in insertion order even after arbitrary removals.
//!
//! # Durability
//!
//! redb commits with `Durability::Immediate`: each trait call is one
//! transaction and is persistent when it returns. Individual calls are
//! atomic; pairs of calls (record write + index write) are not.

use async_trait::async_trait;
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use std::path::Path;
use std::sync::Arc;

use super::{KvStore, StoreResult};

/// Order records: key = derived record key, value = codec bytes
const RECORDS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("order_records");

/// Ordered index: key = rank sequence, value = order id
const INDEX_TABLE: TableDefinition<u64, u64> = TableDefinition::new("order_index");

/// Reverse index: key = order id, value = rank sequence
const INDEX_RANK_TABLE: TableDefinition<u64, u64> = TableDefinition::new("order_index_rank");

/// Counters: key = counter name, value = current value
const COUNTER_TABLE: TableDefinition<&str, u64> = TableDefinition::new("counters");

const RANK_SEQ_KEY: &str = "index_rank_seq";

/// Key-value store backed by redb.
///
/// Cloning shares the underlying database handle; the handle is safe for
/// concurrent use by many callers.
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create the database at the given path.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StoreResult<Self> {
        // Create all tables up front so reads never hit a missing table
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(RECORDS_TABLE)?;
            let _ = write_txn.open_table(INDEX_TABLE)?;
            let _ = write_txn.open_table(INDEX_RANK_TABLE)?;

            let mut counters = write_txn.open_table(COUNTER_TABLE)?;
            if counters.get(RANK_SEQ_KEY)?.is_none() {
                counters.insert(RANK_SEQ_KEY, 0u64)?;
            }
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }
}

#[async_trait]
impl KvStore for RedbStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RECORDS_TABLE)?;
        Ok(table.get(key)?.map(|guard| guard.value().to_vec()))
    }

    async fn put_if_absent(&self, key: &str, value: &[u8]) -> StoreResult<bool> {
        let txn = self.db.begin_write()?;
        let inserted = {
            let mut table = txn.open_table(RECORDS_TABLE)?;
            if table.get(key)?.is_some() {
                false
            } else {
                table.insert(key, value)?;
                true
            }
        };
        txn.commit()?;
        Ok(inserted)
    }

    async fn put_if_present(&self, key: &str, value: &[u8]) -> StoreResult<bool> {
        let txn = self.db.begin_write()?;
        let replaced = {
            let mut table = txn.open_table(RECORDS_TABLE)?;
            if table.get(key)?.is_none() {
                false
            } else {
                table.insert(key, value)?;
                true
            }
        };
        txn.commit()?;
        Ok(replaced)
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        let txn = self.db.begin_write()?;
        let existed = {
            let mut table = txn.open_table(RECORDS_TABLE)?;
            table.remove(key)?.is_some()
        };
        txn.commit()?;
        Ok(existed)
    }

    async fn index_append(&self, id: u64) -> StoreResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut counters = txn.open_table(COUNTER_TABLE)?;
            let rank = counters
                .get(RANK_SEQ_KEY)?
                .map(|guard| guard.value())
                .unwrap_or(0)
                + 1;
            counters.insert(RANK_SEQ_KEY, rank)?;
            drop(counters);

            let mut index = txn.open_table(INDEX_TABLE)?;
            index.insert(rank, id)?;
            drop(index);

            let mut ranks = txn.open_table(INDEX_RANK_TABLE)?;
            ranks.insert(id, rank)?;
        }
        txn.commit()?;
        Ok(())
    }

    async fn index_remove(&self, id: u64) -> StoreResult<bool> {
        let txn = self.db.begin_write()?;
        let removed = {
            let mut ranks = txn.open_table(INDEX_RANK_TABLE)?;
            let rank = ranks.remove(id)?.map(|guard| guard.value());
            drop(ranks);

            match rank {
                Some(rank) => {
                    let mut index = txn.open_table(INDEX_TABLE)?;
                    index.remove(rank)?;
                    true
                }
                None => false,
            }
        };
        txn.commit()?;
        Ok(removed)
    }

    async fn index_range(&self, offset: u64, size: u64) -> StoreResult<(Vec<u64>, bool)> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(INDEX_TABLE)?;

        let total = table.len()?;
        let mut ids = Vec::new();
        for result in table.iter()?.skip(offset as usize).take(size as usize) {
            let (_rank, id) = result?;
            ids.push(id.value());
        }

        let has_more = offset.saturating_add(ids.len() as u64) < total;
        Ok((ids, has_more))
    }
}
