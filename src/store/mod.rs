//! Key-value store capability surface.
//!
//! The repository is constructed with an `Arc<dyn KvStore>` — an explicitly
//! passed handle, never a process-global. The trait is deliberately narrow:
//! byte records addressed by string keys, plus one fixed ordered index
//! structure supporting range-by-rank reads for cursor pagination.
//!
//! Every method is one independent operation against the backend. Callers
//! that need a pair of writes (record + index entry) get no atomicity
//! guarantee across the pair from this surface; see `OrderRepository` for
//! how divergence is detected and logged.

pub mod redb;

use async_trait::async_trait;
use thiserror::Error;

pub use self::redb::RedbStore;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] ::redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] ::redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] ::redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] ::redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] ::redb::CommitError),

    #[error("Key already exists: {0}")]
    AlreadyExists(String),

    #[error("Index/record divergence: {0}")]
    Inconsistent(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Record key derived deterministically from the order identifier.
pub fn order_key(order_id: u64) -> String {
    format!("order:{}", order_id)
}

/// Thin capability surface over the key-value backend.
///
/// Implementations must be safe for concurrent use by many callers; all
/// ordering and mutual exclusion is delegated to the backend. Methods are
/// async so callers can bound them with a timeout and cancel promptly by
/// dropping the future.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Fetch the record stored under `key`, if any.
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Write `value` under `key` only if the key is absent.
    ///
    /// Returns `false` (writing nothing) when the key already exists. This
    /// is the uniqueness-violation signal a collision-checked identity draw
    /// relies on.
    async fn put_if_absent(&self, key: &str, value: &[u8]) -> StoreResult<bool>;

    /// Overwrite the record under `key` only if the key exists.
    ///
    /// Returns `false` (writing nothing) when the key is absent.
    async fn put_if_present(&self, key: &str, value: &[u8]) -> StoreResult<bool>;

    /// Remove the record under `key`. Returns whether the key existed.
    async fn delete(&self, key: &str) -> StoreResult<bool>;

    // ========== Ordered Index ==========
    //
    // One well-known index structure: the set of live order identifiers in
    // insertion order, readable by rank range.

    /// Append `id` at the end of the index.
    async fn index_append(&self, id: u64) -> StoreResult<()>;

    /// Remove `id` from the index. Returns whether it was present.
    async fn index_remove(&self, id: u64) -> StoreResult<bool>;

    /// Return up to `size` identifiers starting at rank `offset`, plus
    /// whether further entries exist beyond the returned page.
    async fn index_range(&self, offset: u64, size: u64) -> StoreResult<(Vec<u64>, bool)>;
}
