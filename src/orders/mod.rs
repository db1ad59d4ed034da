//! Order domain: entity, codec, identity, index, repository and the
//! transition-enforcing service.
//!
//! # Architecture
//!
//! ```text
//! OrderService ──▶ OrderRepository ──▶ codec (bytes ↔ Order)
//!   (identity,          │
//!    transitions)       ├──▶ KvStore  (record per order)
//!                       └──▶ OrderIndex (live ids, insertion order)
//! ```

pub mod codec;
pub mod id;
pub mod index;
pub mod model;
pub mod repository;
pub mod service;

// Re-exports
pub use codec::CodecError;
pub use id::{IdGenerator, RandomIdGenerator};
pub use index::OrderIndex;
pub use model::{LineItem, Order, OrderStatus};
pub use repository::{FindAllPage, FindAllResult, OrderRepository, RepoError, RepoResult};
pub use service::{DEFAULT_PAGE_SIZE, OrderService, ServiceError, ServiceResult};
