use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, OrderId};
use stockroom_orders::{Order, OrderStatus};

use crate::store::{OrderWrite, WriteSet};

/// Audit detail for `order.status_updated`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdateDetails {
    pub order_id: OrderId,
    pub from: OrderStatus,
    pub to: OrderStatus,
}

/// Audit detail for `order.deleted`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDeletedDetails {
    pub order_id: OrderId,
    pub customer_name: String,
    pub status: OrderStatus,
}

/// Plan a status update as a CAS on the status the caller saw.
///
/// If the order moved concurrently, the commit conflicts and the engine
/// retries against the fresh state, so a lost update is impossible: the
/// second of two racing "advance" requests resolves to `InvalidTransition`
/// rather than silently overwriting.
pub fn plan_status_update(order: &Order, next: OrderStatus) -> DomainResult<WriteSet> {
    if !order.status.can_transition_to(next) {
        return Err(DomainError::invalid_transition(
            order.status.as_str(),
            next.as_str(),
        ));
    }
    Ok(WriteSet {
        ledger: vec![],
        totals: vec![],
        order: Some(OrderWrite::SetStatus {
            order_id: order.id,
            expected: order.status,
            next,
        }),
    })
}

/// Plan order deletion.
///
/// Removes the order and its items. Deliberately does **not** reverse the
/// stock deduction made at creation time; the audit trail keeps the record.
pub fn plan_delete(order: &Order) -> WriteSet {
    WriteSet {
        ledger: vec![],
        totals: vec![],
        order: Some(OrderWrite::Delete { order_id: order.id }),
    }
}
