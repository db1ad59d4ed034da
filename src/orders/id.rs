//! Order identity generation.

/// Produces order identifiers intended to be unique across all orders ever
/// created.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> u64;
}

/// Uniform random draw over the full 64-bit space.
///
/// The collision probability is low enough to be acceptable in practice but
/// it is **not zero** — this is a known weak point, not a guarantee. The
/// store reports a uniqueness violation on insert
/// (`StoreError::AlreadyExists`), and `OrderService::create_order` retries
/// with a fresh draw a bounded number of times.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> u64 {
        rand::random()
    }
}
