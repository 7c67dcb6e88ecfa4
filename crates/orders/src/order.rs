use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, OrderId, ProductId};

/// Order status lifecycle.
///
/// Transitions only move forward: Pending → InTransit → Received, with
/// Pending → Received allowed as a skip. Deletion is a separate terminal
/// action, not a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    InTransit,
    Received,
}

impl OrderStatus {
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, InTransit) | (Pending, Received) | (InTransit, Received)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::InTransit => "In Transit",
            OrderStatus::Received => "Received",
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One order line. Immutable once the order is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Sales order with its items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Validate and assemble a new order in `Pending` status.
    ///
    /// Items are inserted exactly once, here; there is no later add-item
    /// operation.
    pub fn new(
        id: OrderId,
        customer_name: impl Into<String>,
        items: Vec<OrderItem>,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let customer_name = customer_name.into();
        if customer_name.trim().is_empty() {
            return Err(DomainError::validation("customer name cannot be empty"));
        }
        if items.is_empty() {
            return Err(DomainError::validation("order must have at least one item"));
        }
        for item in &items {
            if item.quantity <= 0 {
                return Err(DomainError::validation(format!(
                    "item quantity must be positive (product {})",
                    item.product_id
                )));
            }
        }
        // One line per product keeps the per-item deduction unambiguous.
        for (i, item) in items.iter().enumerate() {
            if items[..i].iter().any(|o| o.product_id == item.product_id) {
                return Err(DomainError::validation(format!(
                    "duplicate order line for product {}",
                    item.product_id
                )));
            }
        }
        Ok(Self {
            id,
            customer_name,
            status: OrderStatus::Pending,
            items,
            created_at,
        })
    }

    /// Replace the initial status. Creation may land directly in any
    /// lifecycle state; later changes go through [`Order::transition`].
    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    /// Apply a status transition, rejecting anything the lifecycle forbids.
    pub fn transition(&mut self, next: OrderStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::invalid_transition(
                self.status.as_str(),
                next.as_str(),
            ));
        }
        self.status = next;
        Ok(())
    }
}
