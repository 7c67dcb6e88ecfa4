use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, ProductId, WarehouseId};
use stockroom_ledger::{LedgerKey, apply_delta};

use crate::store::{LedgerWrite, StockSnapshot, TotalWrite, WriteSet};

/// Command: add quantity to one (product, warehouse) ledger row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestockCommand {
    pub product_id: ProductId,
    pub warehouse_id: WarehouseId,
    pub quantity: i64,
}

impl RestockCommand {
    pub fn key(&self) -> LedgerKey {
        LedgerKey::new(self.product_id, self.warehouse_id)
    }
}

/// Audit detail for `stock.restocked`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestockDetails {
    pub product_id: ProductId,
    pub warehouse_id: WarehouseId,
    pub quantity: i64,
    pub new_quantity: i64,
}

pub fn validate(cmd: &RestockCommand) -> DomainResult<()> {
    if cmd.quantity <= 0 {
        return Err(DomainError::validation("restock quantity must be positive"));
    }
    Ok(())
}

/// Plan the restock: ledger row `+qty` (created if absent) and product total
/// `+qty`, one atomic unit. Restocking never faces insufficient stock.
/// Returns the writes along with the row quantity they produce.
pub fn plan(cmd: &RestockCommand, snapshot: &StockSnapshot) -> DomainResult<(WriteSet, i64)> {
    let key = cmd.key();
    let row = snapshot.ledger_row(&key);
    let total = snapshot.total(&cmd.product_id);

    let new_quantity = apply_delta(cmd.product_id, row.quantity, cmd.quantity)?;
    let new_total = apply_delta(cmd.product_id, total.quantity, cmd.quantity)?;

    let writes = WriteSet {
        ledger: vec![LedgerWrite {
            key,
            expected_version: row.version,
            new_quantity,
        }],
        totals: vec![TotalWrite {
            product_id: cmd.product_id,
            expected_version: total.version,
            new_total,
        }],
        order: None,
    };
    Ok((writes, new_quantity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::VersionedQuantity;

    fn cmd(quantity: i64) -> RestockCommand {
        RestockCommand {
            product_id: ProductId::new(),
            warehouse_id: WarehouseId::new(),
            quantity,
        }
    }

    #[test]
    fn non_positive_quantity_fails_validation() {
        assert!(matches!(validate(&cmd(0)), Err(DomainError::Validation(_))));
        assert!(matches!(validate(&cmd(-5)), Err(DomainError::Validation(_))));
        validate(&cmd(1)).unwrap();
    }

    #[test]
    fn first_restock_creates_the_row() {
        let c = cmd(20);
        let (writes, new_quantity) = plan(&c, &StockSnapshot::default()).unwrap();

        assert_eq!(writes.ledger.len(), 1);
        assert_eq!(writes.ledger[0].expected_version, 0);
        assert_eq!(writes.ledger[0].new_quantity, 20);
        assert_eq!(new_quantity, 20);
        assert_eq!(writes.totals[0].new_total, 20);
        assert!(writes.order.is_none());
    }

    #[test]
    fn restock_adds_to_existing_quantities() {
        let c = cmd(20);
        let mut snapshot = StockSnapshot::default();
        snapshot.ledger.insert(
            c.key(),
            VersionedQuantity {
                quantity: 30,
                version: 3,
            },
        );
        snapshot.totals.insert(
            c.product_id,
            VersionedQuantity {
                quantity: 45,
                version: 7,
            },
        );

        let (writes, new_quantity) = plan(&c, &snapshot).unwrap();
        assert_eq!(writes.ledger[0].new_quantity, 50);
        assert_eq!(new_quantity, 50);
        assert_eq!(writes.ledger[0].expected_version, 3);
        assert_eq!(writes.totals[0].new_total, 65);
        assert_eq!(writes.totals[0].expected_version, 7);
    }
}
