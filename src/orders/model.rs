//! Order entity and its derived lifecycle status.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single purchased item on an order.
///
/// The repository never interprets line items; they are stored and returned
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub item_id: Uuid,
    pub quantity: u32,
    pub price: Decimal,
}

/// The persisted order record.
///
/// `order_id`, `customer_id`, `line_items` and `created_at` are immutable
/// once assigned. The only post-creation mutation is the status transition,
/// which sets `shipped_at` and later `completed_at`. Status itself is never
/// stored; it is derived from the timestamp pair (see [`Order::status`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: u64,
    pub customer_id: Uuid,
    pub line_items: Vec<LineItem>,
    pub created_at: DateTime<Utc>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Derived lifecycle stage. Strictly forward: Pending → Shipped → Completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Shipped,
    Completed,
}

impl Order {
    /// Status derived from the timestamp pair.
    ///
    /// Invariant: `completed_at` is never set while `shipped_at` is null.
    /// The enforcing layer (`OrderService`) guarantees this before any
    /// record reaches storage.
    pub fn status(&self) -> OrderStatus {
        match (self.shipped_at, self.completed_at) {
            (None, _) => OrderStatus::Pending,
            (Some(_), None) => OrderStatus::Shipped,
            (Some(_), Some(_)) => OrderStatus::Completed,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Shipped => write!(f, "shipped"),
            OrderStatus::Completed => write!(f, "completed"),
        }
    }
}
