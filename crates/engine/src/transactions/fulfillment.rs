use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, OrderId, ProductId, WarehouseId};
use stockroom_ledger::LedgerKey;
use stockroom_orders::{Order, OrderItem, OrderStatus};

use crate::store::{LedgerWrite, OrderWrite, StockSnapshot, TotalWrite, WriteSet};

/// Command: create an order, deducting stock for every line or not at all.
///
/// The order may start in any lifecycle state (a phoned-in order can already
/// be in transit when it is recorded); `None` means `Pending`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderCommand {
    pub customer_name: String,
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub status: Option<OrderStatus>,
}

/// One warehouse's share of an item deduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarehouseDeduction {
    pub warehouse_id: WarehouseId,
    pub quantity: i64,
}

/// One fulfilled line with where its stock came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfilledLine {
    pub product_id: ProductId,
    pub quantity: i64,
    pub deductions: Vec<WarehouseDeduction>,
}

/// Audit detail for `order.fulfilled`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfillmentDetails {
    pub order_id: OrderId,
    pub customer_name: String,
    pub lines: Vec<FulfilledLine>,
}

/// Plan order fulfillment against one snapshot.
///
/// Every item is checked against the product total from the same snapshot
/// the deduction is computed from; the commit's version checks close the
/// remaining check-to-commit window. The first failing item aborts the whole
/// order with `InsufficientStock` and nothing else is planned.
///
/// Deduction walks the product's ledger rows in fixed key order until the
/// line is covered, which keeps the total equal to the sum of the rows at
/// the committed state.
pub fn plan(order: &Order, snapshot: &StockSnapshot) -> DomainResult<(WriteSet, Vec<FulfilledLine>)> {
    // Working copy of row quantities so multiple lines never double-spend a
    // row (orders reject duplicate products, but the guard is cheap to keep
    // local).
    let mut working: BTreeMap<LedgerKey, i64> = snapshot
        .ledger
        .iter()
        .map(|(key, vq)| (*key, vq.quantity))
        .collect();

    let mut ledger_writes: BTreeMap<LedgerKey, LedgerWrite> = BTreeMap::new();
    let mut total_writes: Vec<TotalWrite> = Vec::new();
    let mut lines: Vec<FulfilledLine> = Vec::new();

    for item in &order.items {
        let total = snapshot.total(&item.product_id);
        if total.quantity < item.quantity {
            return Err(DomainError::insufficient_stock(
                item.product_id,
                item.quantity,
                total.quantity,
            ));
        }

        let mut remaining = item.quantity;
        let mut deductions: Vec<WarehouseDeduction> = Vec::new();

        for (key, vq) in snapshot.product_rows(&item.product_id) {
            if remaining == 0 {
                break;
            }
            let available = working.get(key).copied().unwrap_or(vq.quantity);
            if available == 0 {
                continue;
            }
            let take = remaining.min(available);
            remaining -= take;
            working.insert(*key, available - take);
            deductions.push(WarehouseDeduction {
                warehouse_id: key.warehouse_id,
                quantity: take,
            });
            ledger_writes.insert(
                *key,
                LedgerWrite {
                    key: *key,
                    expected_version: vq.version,
                    new_quantity: available - take,
                },
            );
        }

        if remaining > 0 {
            // Total claimed coverage the rows cannot back: the aggregate has
            // drifted from the ledger. Refuse rather than commit on top of it.
            return Err(DomainError::insufficient_stock(
                item.product_id,
                item.quantity,
                item.quantity - remaining,
            ));
        }

        total_writes.push(TotalWrite {
            product_id: item.product_id,
            expected_version: total.version,
            new_total: total.quantity - item.quantity,
        });
        lines.push(FulfilledLine {
            product_id: item.product_id,
            quantity: item.quantity,
            deductions,
        });
    }

    let writes = WriteSet {
        ledger: ledger_writes.into_values().collect(),
        totals: total_writes,
        order: Some(OrderWrite::Insert(order.clone())),
    };

    Ok((writes, lines))
}
