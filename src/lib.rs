//! Crab Orders - 订单存储库
//!
//! Durable order repository over an embedded key-value store, with
//! cursor-based pagination and a strictly forward status lifecycle.
//!
//! # 模块结构
//!
//! ```text
//! src/
//! ├── core/     # 配置
//! ├── store/    # key-value 存储层 (redb)
//! └── orders/   # 订单领域: 实体、编解码、索引、仓储、服务
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use crab_orders::{OrderRepository, OrderService, RandomIdGenerator, RedbStore, StoreConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StoreConfig::from_env();
//! let store = Arc::new(RedbStore::open(&config.store_path)?);
//! let service = OrderService::new(OrderRepository::new(store), Arc::new(RandomIdGenerator))
//!     .with_page_size(config.page_size);
//!
//! let order = service.create_order(uuid::Uuid::new_v4(), vec![]).await?;
//! let shipped = service.ship_order(order.order_id).await?;
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod orders;
pub mod store;

// Re-export 公共类型
pub use crate::core::StoreConfig;
pub use orders::{
    CodecError, FindAllPage, FindAllResult, IdGenerator, LineItem, Order, OrderIndex,
    OrderRepository, OrderService, OrderStatus, RandomIdGenerator, RepoError, RepoResult,
    ServiceError, ServiceResult,
};
pub use store::{KvStore, RedbStore, StoreError, StoreResult};
