//! Read-only report assembly.
//!
//! Pure functions over ledger rows, totals, catalog data and audit entries.
//! Report rows are tagged variants, one case per report kind, instead of a
//! single row shape with per-kind optional fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stockroom_audit::{AuditEntry, actions};
use stockroom_catalog::Catalog;
use stockroom_core::{ProductId, WarehouseId};
use stockroom_ledger::{ProductTotal, StockEntry, ThresholdPolicy};

use crate::transactions::fulfillment::FulfillmentDetails;
use crate::transactions::restock::RestockDetails;
use crate::transactions::transfer::TransferDetails;

/// One report, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Report {
    CurrentStock(Vec<StockReportRow>),
    LowStock(Vec<StockReportRow>),
    StockMovement(Vec<MovementRow>),
    InventoryValue(Vec<ValuationRow>),
}

/// Ledger row joined with product/warehouse identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockReportRow {
    pub product_id: ProductId,
    pub product_name: String,
    pub warehouse_id: WarehouseId,
    pub warehouse_name: String,
    pub quantity: i64,
    /// The threshold in force for this row under the chosen policy.
    pub threshold: i64,
}

/// One ledger-affecting movement, reconstructed from the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementRow {
    pub audit_id: Uuid,
    pub action: String,
    pub product_id: ProductId,
    pub warehouse_id: WarehouseId,
    pub quantity_delta: i64,
    pub recorded_at: DateTime<Utc>,
}

/// Per-product valuation: cost price × total stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuationRow {
    pub product_id: ProductId,
    pub product_name: String,
    pub cost_price: u64,
    pub total_stock: i64,
    pub total_value: u64,
}

fn product_name<C: Catalog>(catalog: &C, product_id: &ProductId) -> String {
    catalog
        .product(product_id)
        .map(|p| p.name)
        .unwrap_or_else(|| product_id.to_string())
}

fn warehouse_name<C: Catalog>(catalog: &C, warehouse_id: &WarehouseId) -> String {
    catalog
        .warehouse(warehouse_id)
        .map(|w| w.name)
        .unwrap_or_else(|| warehouse_id.to_string())
}

/// Every ledger row with names and its effective threshold.
pub fn current_stock<C: Catalog>(
    rows: &[StockEntry],
    catalog: &C,
    policy: ThresholdPolicy,
) -> Vec<StockReportRow> {
    rows.iter()
        .map(|entry| {
            let per_product = catalog
                .product(&entry.product_id)
                .and_then(|p| p.low_stock_threshold);
            StockReportRow {
                product_id: entry.product_id,
                product_name: product_name(catalog, &entry.product_id),
                warehouse_id: entry.warehouse_id,
                warehouse_name: warehouse_name(catalog, &entry.warehouse_id),
                quantity: entry.quantity,
                threshold: policy.effective(per_product),
            }
        })
        .collect()
}

/// Current stock filtered down to rows at or under their threshold.
pub fn low_stock<C: Catalog>(
    rows: &[StockEntry],
    catalog: &C,
    policy: ThresholdPolicy,
) -> Vec<StockReportRow> {
    current_stock(rows, catalog, policy)
        .into_iter()
        .filter(|row| row.quantity <= row.threshold)
        .collect()
}

/// Chronological movement history (newest first) from ledger-affecting audit
/// entries. Transfers yield one row per touched warehouse; fulfillments one
/// row per warehouse deduction. Entries with undecodable details are skipped.
pub fn stock_movement(entries: &[AuditEntry]) -> Vec<MovementRow> {
    let mut rows = Vec::new();

    for entry in entries {
        match entry.action.as_str() {
            actions::STOCK_RESTOCKED => {
                if let Ok(d) = serde_json::from_value::<RestockDetails>(entry.details.clone()) {
                    rows.push(MovementRow {
                        audit_id: entry.id,
                        action: entry.action.clone(),
                        product_id: d.product_id,
                        warehouse_id: d.warehouse_id,
                        quantity_delta: d.quantity,
                        recorded_at: entry.recorded_at,
                    });
                }
            }
            actions::STOCK_TRANSFERRED => {
                if let Ok(d) = serde_json::from_value::<TransferDetails>(entry.details.clone()) {
                    rows.push(MovementRow {
                        audit_id: entry.id,
                        action: entry.action.clone(),
                        product_id: d.product_id,
                        warehouse_id: d.from_warehouse_id,
                        quantity_delta: -d.quantity,
                        recorded_at: entry.recorded_at,
                    });
                    rows.push(MovementRow {
                        audit_id: entry.id,
                        action: entry.action.clone(),
                        product_id: d.product_id,
                        warehouse_id: d.to_warehouse_id,
                        quantity_delta: d.quantity,
                        recorded_at: entry.recorded_at,
                    });
                }
            }
            actions::ORDER_FULFILLED => {
                if let Ok(d) = serde_json::from_value::<FulfillmentDetails>(entry.details.clone()) {
                    for line in &d.lines {
                        for deduction in &line.deductions {
                            rows.push(MovementRow {
                                audit_id: entry.id,
                                action: entry.action.clone(),
                                product_id: line.product_id,
                                warehouse_id: deduction.warehouse_id,
                                quantity_delta: -deduction.quantity,
                                recorded_at: entry.recorded_at,
                            });
                        }
                    }
                }
            }
            _ => {}
        }
    }

    rows
}

/// Per-product inventory valuation from totals and catalog cost prices.
/// Products missing from the catalog are skipped (no cost to value them at).
pub fn inventory_value<C: Catalog>(totals: &[ProductTotal], catalog: &C) -> Vec<ValuationRow> {
    totals
        .iter()
        .filter_map(|t| {
            let product = catalog.product(&t.product_id)?;
            let total_value = if t.total_stock > 0 {
                product.cost_price.saturating_mul(t.total_stock as u64)
            } else {
                0
            };
            Some(ValuationRow {
                product_id: t.product_id,
                product_name: product.name,
                cost_price: product.cost_price,
                total_stock: t.total_stock,
                total_value,
            })
        })
        .collect()
}

/// Grand total across every valuation row.
pub fn total_inventory_value(rows: &[ValuationRow]) -> u64 {
    rows.iter().fold(0u64, |acc, r| acc.saturating_add(r.total_value))
}
