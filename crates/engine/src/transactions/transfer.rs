use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, ProductId, WarehouseId};
use stockroom_ledger::{LedgerKey, apply_delta};

use crate::store::{LedgerWrite, StockSnapshot, TotalWrite, WriteSet};

/// Command: move quantity of a product between two warehouses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferCommand {
    pub product_id: ProductId,
    pub from_warehouse_id: WarehouseId,
    pub to_warehouse_id: WarehouseId,
    pub quantity: i64,
}

impl TransferCommand {
    pub fn from_key(&self) -> LedgerKey {
        LedgerKey::new(self.product_id, self.from_warehouse_id)
    }

    pub fn to_key(&self) -> LedgerKey {
        LedgerKey::new(self.product_id, self.to_warehouse_id)
    }
}

/// Audit detail for `stock.transferred`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferDetails {
    pub product_id: ProductId,
    pub from_warehouse_id: WarehouseId,
    pub to_warehouse_id: WarehouseId,
    pub quantity: i64,
}

pub fn validate(cmd: &TransferCommand) -> DomainResult<()> {
    if cmd.quantity <= 0 {
        return Err(DomainError::validation("transfer quantity must be positive"));
    }
    if cmd.from_warehouse_id == cmd.to_warehouse_id {
        return Err(DomainError::validation(
            "transfer source and destination warehouses must differ",
        ));
    }
    Ok(())
}

/// Plan the transfer: source `-qty`, destination `+qty`, one atomic unit.
///
/// The product total is untouched (net delta is zero) but its version is
/// still checked and bumped, so a concurrent fulfillment deducting from the
/// same product serializes against the transfer instead of interleaving
/// between the two ledger writes.
pub fn plan(cmd: &TransferCommand, snapshot: &StockSnapshot) -> DomainResult<WriteSet> {
    let from = snapshot.ledger_row(&cmd.from_key());
    let to = snapshot.ledger_row(&cmd.to_key());
    let total = snapshot.total(&cmd.product_id);

    let new_from = apply_delta(cmd.product_id, from.quantity, -cmd.quantity)?;
    let new_to = apply_delta(cmd.product_id, to.quantity, cmd.quantity)?;

    // Commit applies these in fixed LedgerKey order, whatever the direction.
    Ok(WriteSet {
        ledger: vec![
            LedgerWrite {
                key: cmd.from_key(),
                expected_version: from.version,
                new_quantity: new_from,
            },
            LedgerWrite {
                key: cmd.to_key(),
                expected_version: to.version,
                new_quantity: new_to,
            },
        ],
        totals: vec![TotalWrite {
            product_id: cmd.product_id,
            expected_version: total.version,
            new_total: total.quantity,
        }],
        order: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::VersionedQuantity;

    fn cmd(quantity: i64) -> TransferCommand {
        TransferCommand {
            product_id: ProductId::new(),
            from_warehouse_id: WarehouseId::new(),
            to_warehouse_id: WarehouseId::new(),
            quantity,
        }
    }

    fn snapshot_with_source(cmd: &TransferCommand, quantity: i64) -> StockSnapshot {
        let mut snapshot = StockSnapshot::default();
        snapshot.ledger.insert(
            cmd.from_key(),
            VersionedQuantity {
                quantity,
                version: 1,
            },
        );
        snapshot.totals.insert(
            cmd.product_id,
            VersionedQuantity {
                quantity,
                version: 1,
            },
        );
        snapshot
    }

    #[test]
    fn same_warehouse_fails_validation() {
        let mut c = cmd(5);
        c.to_warehouse_id = c.from_warehouse_id;
        assert!(matches!(validate(&c), Err(DomainError::Validation(_))));
    }

    #[test]
    fn non_positive_quantity_fails_validation() {
        assert!(matches!(validate(&cmd(0)), Err(DomainError::Validation(_))));
    }

    #[test]
    fn moves_quantity_and_keeps_the_total() {
        let c = cmd(30);
        let writes = plan(&c, &snapshot_with_source(&c, 100)).unwrap();

        let from = writes.ledger.iter().find(|w| w.key == c.from_key()).unwrap();
        let to = writes.ledger.iter().find(|w| w.key == c.to_key()).unwrap();
        assert_eq!(from.new_quantity, 70);
        assert_eq!(to.new_quantity, 30);
        assert_eq!(to.expected_version, 0); // destination row created on demand

        assert_eq!(writes.totals[0].new_total, 100);
    }

    #[test]
    fn insufficient_source_aborts_the_whole_plan() {
        let c = cmd(30);
        let err = plan(&c, &snapshot_with_source(&c, 29)).unwrap_err();
        match err {
            DomainError::InsufficientStock {
                requested,
                available,
                ..
            } => {
                assert_eq!(requested, 30);
                assert_eq!(available, 29);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
    }

    #[test]
    fn transfer_from_an_absent_row_is_insufficient_stock() {
        let c = cmd(1);
        let err = plan(&c, &StockSnapshot::default()).unwrap_err();
        assert!(matches!(err, DomainError::InsufficientStock { .. }));
    }
}
