//! Order service: the layer that decides *which* mutation happens.
//!
//! The repository persists records verbatim; this layer owns everything the
//! repository deliberately does not: identity draws (with collision retry),
//! creation timestamps, and validation of the strictly forward status state
//! machine (pending → shipped → completed, each transition at most once).

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use super::id::IdGenerator;
use super::model::{LineItem, Order, OrderStatus};
use super::repository::{FindAllPage, FindAllResult, OrderRepository, RepoError};
use crate::store::StoreError;

/// Default page size for listing, when the caller supplies only a cursor.
pub const DEFAULT_PAGE_SIZE: u64 = 50;

/// Identity redraws before giving up on a colliding random draw.
const MAX_ID_ATTEMPTS: u32 = 3;

/// Service errors
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error("Identity draws exhausted after {MAX_ID_ATTEMPTS} collisions")]
    IdExhausted,

    #[error(transparent)]
    Repo(#[from] RepoError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Clone)]
pub struct OrderService {
    repo: OrderRepository,
    ids: Arc<dyn IdGenerator>,
    page_size: u64,
}

impl OrderService {
    pub fn new(repo: OrderRepository, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            repo,
            ids,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size;
        self
    }

    /// Create and persist a new pending order.
    ///
    /// Draws a random identifier and retries on a uniqueness violation
    /// reported by the store, so a latent collision never overwrites an
    /// existing record.
    pub async fn create_order(
        &self,
        customer_id: Uuid,
        line_items: Vec<LineItem>,
    ) -> ServiceResult<Order> {
        for attempt in 0..MAX_ID_ATTEMPTS {
            let order = Order {
                order_id: self.ids.next_id(),
                customer_id,
                line_items: line_items.clone(),
                created_at: Utc::now(),
                shipped_at: None,
                completed_at: None,
            };

            match self.repo.insert(&order).await {
                Ok(()) => return Ok(order),
                Err(RepoError::Store(StoreError::AlreadyExists(_))) => {
                    tracing::warn!(
                        order_id = order.order_id,
                        attempt,
                        "order id collision, redrawing"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }
        Err(ServiceError::IdExhausted)
    }

    pub async fn get_order(&self, id: u64) -> ServiceResult<Order> {
        Ok(self.repo.find_by_id(id).await?)
    }

    /// One page of orders starting at `cursor` (0 for the first page).
    ///
    /// The returned `cursor` is 0 when no further page exists.
    pub async fn list_orders(&self, cursor: u64) -> ServiceResult<FindAllResult> {
        Ok(self
            .repo
            .find_all(FindAllPage {
                offset: cursor,
                size: self.page_size,
            })
            .await?)
    }

    /// Transition a pending order to shipped.
    pub async fn ship_order(&self, id: u64) -> ServiceResult<Order> {
        let mut order = self.repo.find_by_id(id).await?;

        if order.shipped_at.is_some() {
            return Err(ServiceError::InvalidTransition {
                from: order.status(),
                to: OrderStatus::Shipped,
            });
        }

        order.shipped_at = Some(Utc::now());
        self.repo.update(&order).await?;
        Ok(order)
    }

    /// Transition a shipped order to completed.
    ///
    /// `completed_at` is never set while `shipped_at` is null; an unshipped
    /// order must go through `ship_order` first.
    pub async fn complete_order(&self, id: u64) -> ServiceResult<Order> {
        let mut order = self.repo.find_by_id(id).await?;

        if order.shipped_at.is_none() || order.completed_at.is_some() {
            return Err(ServiceError::InvalidTransition {
                from: order.status(),
                to: OrderStatus::Completed,
            });
        }

        order.completed_at = Some(Utc::now());
        self.repo.update(&order).await?;
        Ok(order)
    }

    pub async fn delete_order(&self, id: u64) -> ServiceResult<()> {
        Ok(self.repo.delete_by_id(id).await?)
    }
}
