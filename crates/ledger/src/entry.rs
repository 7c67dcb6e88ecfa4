use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, ProductId, WarehouseId};

/// Ledger row key.
///
/// Ordered by warehouse id, then product id. This ordering is the fixed
/// global acquisition/commit order for every multi-row transaction, so two
/// transfers moving stock in opposite directions between the same pair of
/// warehouses touch the rows in the same sequence.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LedgerKey {
    pub warehouse_id: WarehouseId,
    pub product_id: ProductId,
}

impl LedgerKey {
    pub fn new(product_id: ProductId, warehouse_id: WarehouseId) -> Self {
        Self {
            warehouse_id,
            product_id,
        }
    }
}

/// One ledger row: on-hand quantity for a (product, warehouse) pair.
///
/// Rows are created on first restock of the pair and never deleted; the
/// quantity never goes below zero at any committed state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEntry {
    pub product_id: ProductId,
    pub warehouse_id: WarehouseId,
    pub quantity: i64,
    pub last_updated: DateTime<Utc>,
}

impl StockEntry {
    pub fn key(&self) -> LedgerKey {
        LedgerKey::new(self.product_id, self.warehouse_id)
    }
}

/// Denormalized total stock for one product across all warehouses.
///
/// Must equal the sum of the product's ledger rows after every committed
/// mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTotal {
    pub product_id: ProductId,
    pub total_stock: i64,
}

/// Apply a delta to an on-hand quantity.
///
/// The single place the non-negativity rule is decided: a negative delta that
/// would drive the quantity below zero fails with `InsufficientStock`.
pub fn apply_delta(
    product_id: ProductId,
    current: i64,
    delta: i64,
) -> DomainResult<i64> {
    let next = current
        .checked_add(delta)
        .ok_or_else(|| DomainError::validation("quantity overflow"))?;
    if next < 0 {
        return Err(DomainError::insufficient_stock(product_id, -delta, current));
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn key_orders_by_warehouse_then_product() {
        let w1 = WarehouseId::new();
        let w2 = WarehouseId::new();
        let (lo_w, hi_w) = if w1 < w2 { (w1, w2) } else { (w2, w1) };
        let p = ProductId::new();

        assert!(LedgerKey::new(p, lo_w) < LedgerKey::new(p, hi_w));
    }

    #[test]
    fn deduction_below_zero_is_insufficient_stock() {
        let product_id = ProductId::new();
        let err = apply_delta(product_id, 10, -11).unwrap_err();
        match err {
            DomainError::InsufficientStock {
                product_id: p,
                requested,
                available,
            } => {
                assert_eq!(p, product_id);
                assert_eq!(requested, 11);
                assert_eq!(available, 10);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
    }

    #[test]
    fn deduction_to_exactly_zero_is_allowed() {
        assert_eq!(apply_delta(ProductId::new(), 10, -10).unwrap(), 0);
    }

    proptest! {
        /// Property: a successful apply_delta never yields a negative quantity.
        #[test]
        fn applied_quantity_is_never_negative(current in 0i64..1_000_000, delta in -1_000_000i64..1_000_000) {
            if let Ok(next) = apply_delta(ProductId::new(), current, delta) {
                prop_assert!(next >= 0);
                prop_assert_eq!(next, current + delta);
            }
        }
    }
}
