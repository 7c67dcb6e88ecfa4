//! The operation facade.
//!
//! Every mutating operation runs the same cycle: authorize, validate, then
//! snapshot → plan → commit with versioned writes, retried a bounded number
//! of times when the commit detects concurrent movement. Audit recording
//! happens after a successful commit and never fails the operation.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use stockroom_audit::{actions, tables, AuditEntry, AuditRecorder, AuditStore};
use stockroom_auth::permissions::known;
use stockroom_auth::{authorize, Principal};
use stockroom_catalog::Catalog;
use stockroom_core::{DomainError, OrderId, ProductId};
use stockroom_ledger::{LedgerKey, StockEntry, ThresholdPolicy};
use stockroom_orders::{Order, OrderStatus};

use crate::error::EngineError;
use crate::reports::{self, Report};
use crate::store::{StockSnapshot, StockStore, StoreError, WriteSet};
use crate::transactions::fulfillment::{self, CreateOrderCommand, FulfillmentDetails};
use crate::transactions::order_admin::{self, OrderDeletedDetails, StatusUpdateDetails};
use crate::transactions::restock::{self, RestockCommand, RestockDetails};
use crate::transactions::transfer::{self, TransferCommand, TransferDetails};

/// Commit retry budget before a conflict is surfaced to the caller.
pub const DEFAULT_MAX_RETRIES: u32 = 4;

/// Inventory engine over a stock store, a catalog and an audit store.
pub struct InventoryEngine<S, C, A> {
    store: S,
    catalog: C,
    audit: AuditRecorder<A>,
    max_retries: u32,
}

impl<S, C, A> InventoryEngine<S, C, A>
where
    S: StockStore,
    C: Catalog,
    A: AuditStore,
{
    pub fn new(store: S, catalog: C, audit_store: A) -> Self {
        Self {
            store,
            catalog,
            audit: AuditRecorder::new(audit_store),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Audit entries that have not yet reached the audit store.
    pub fn audit_backlog(&self) -> usize {
        self.audit.pending_len()
    }

    /// Snapshot, plan, commit; retry on commit conflict with a fresh
    /// snapshot. Domain failures from the planner abort immediately.
    fn run_transaction<T>(
        &self,
        products: &[ProductId],
        extra_keys: &[LedgerKey],
        mut plan: impl FnMut(&StockSnapshot) -> Result<(WriteSet, T), EngineError>,
    ) -> Result<(DateTime<Utc>, T), EngineError> {
        let mut attempt = 0u32;
        loop {
            let snapshot = self.store.snapshot(products, extra_keys)?;
            let (writes, out) = plan(&snapshot)?;
            match self.store.commit(writes) {
                Ok(committed_at) => return Ok((committed_at, out)),
                Err(StoreError::Conflict(msg)) => {
                    attempt += 1;
                    if attempt > self.max_retries {
                        return Err(EngineError::Conflict(msg));
                    }
                    debug!(attempt, conflict = %msg, "commit conflicted, retrying");
                }
                Err(other) => return Err(other.into()),
            }
        }
    }

    fn record(
        &self,
        action: &'static str,
        table: &'static str,
        record_id: String,
        details: &impl Serialize,
        recorded_at: DateTime<Utc>,
    ) {
        match serde_json::to_value(details) {
            Ok(value) => self.audit.submit(AuditEntry::new(
                action,
                table,
                record_id,
                value,
                recorded_at,
            )),
            Err(e) => warn!(action, error = %e, "audit details failed to serialize; entry dropped"),
        }
    }

    fn require_product(&self, product_id: &ProductId) -> Result<(), EngineError> {
        if self.catalog.product(product_id).is_none() {
            return Err(DomainError::not_found().into());
        }
        Ok(())
    }

    /// Add stock to one (product, warehouse) row. Returns the row as
    /// committed.
    #[instrument(skip(self, principal), fields(actor = %principal.actor_id))]
    pub fn restock(
        &self,
        principal: &Principal,
        cmd: RestockCommand,
    ) -> Result<StockEntry, EngineError> {
        authorize(principal, &known::STOCK_RESTOCK)?;
        restock::validate(&cmd)?;
        self.require_product(&cmd.product_id)?;
        if self.catalog.warehouse(&cmd.warehouse_id).is_none() {
            return Err(DomainError::not_found().into());
        }

        let (committed_at, new_quantity) =
            self.run_transaction(&[cmd.product_id], &[cmd.key()], |snapshot| {
                Ok(restock::plan(&cmd, snapshot)?)
            })?;

        self.record(
            actions::STOCK_RESTOCKED,
            tables::STOCK_ENTRIES,
            cmd.product_id.to_string(),
            &RestockDetails {
                product_id: cmd.product_id,
                warehouse_id: cmd.warehouse_id,
                quantity: cmd.quantity,
                new_quantity,
            },
            committed_at,
        );

        Ok(StockEntry {
            product_id: cmd.product_id,
            warehouse_id: cmd.warehouse_id,
            quantity: new_quantity,
            last_updated: committed_at,
        })
    }

    /// Move stock between warehouses. Returns (source, destination) rows as
    /// committed.
    #[instrument(skip(self, principal), fields(actor = %principal.actor_id))]
    pub fn transfer(
        &self,
        principal: &Principal,
        cmd: TransferCommand,
    ) -> Result<(StockEntry, StockEntry), EngineError> {
        authorize(principal, &known::STOCK_TRANSFER)?;
        transfer::validate(&cmd)?;
        self.require_product(&cmd.product_id)?;
        for warehouse_id in [&cmd.from_warehouse_id, &cmd.to_warehouse_id] {
            if self.catalog.warehouse(warehouse_id).is_none() {
                return Err(DomainError::not_found().into());
            }
        }

        let keys = [cmd.from_key(), cmd.to_key()];
        let (committed_at, (new_from, new_to)) =
            self.run_transaction(&[cmd.product_id], &keys, |snapshot| {
                let writes = transfer::plan(&cmd, snapshot)?;
                let find = |key: LedgerKey| {
                    writes
                        .ledger
                        .iter()
                        .find(|w| w.key == key)
                        .map(|w| w.new_quantity)
                        .unwrap_or(0)
                };
                let quantities = (find(cmd.from_key()), find(cmd.to_key()));
                Ok((writes, quantities))
            })?;

        self.record(
            actions::STOCK_TRANSFERRED,
            tables::STOCK_TRANSFERS,
            cmd.product_id.to_string(),
            &TransferDetails {
                product_id: cmd.product_id,
                from_warehouse_id: cmd.from_warehouse_id,
                to_warehouse_id: cmd.to_warehouse_id,
                quantity: cmd.quantity,
            },
            committed_at,
        );

        let row = |warehouse_id, quantity| StockEntry {
            product_id: cmd.product_id,
            warehouse_id,
            quantity,
            last_updated: committed_at,
        };
        Ok((
            row(cmd.from_warehouse_id, new_from),
            row(cmd.to_warehouse_id, new_to),
        ))
    }

    /// Create an order, deducting stock for every line or failing the whole
    /// order. The order is inserted in `Pending` status.
    #[instrument(skip(self, principal, cmd), fields(actor = %principal.actor_id, customer = %cmd.customer_name))]
    pub fn create_order(
        &self,
        principal: &Principal,
        cmd: CreateOrderCommand,
    ) -> Result<Order, EngineError> {
        authorize(principal, &known::ORDERS_CREATE)?;
        let order = Order::new(OrderId::new(), cmd.customer_name, cmd.items, Utc::now())?
            .with_status(cmd.status.unwrap_or(OrderStatus::Pending));
        for item in &order.items {
            self.require_product(&item.product_id)?;
        }

        let products: Vec<ProductId> = order.items.iter().map(|i| i.product_id).collect();
        let (committed_at, lines) = self.run_transaction(&products, &[], |snapshot| {
            let (writes, lines) = fulfillment::plan(&order, snapshot)?;
            Ok((writes, lines))
        })?;

        self.record(
            actions::ORDER_FULFILLED,
            tables::SALES_ORDERS,
            order.id.to_string(),
            &FulfillmentDetails {
                order_id: order.id,
                customer_name: order.customer_name.clone(),
                lines,
            },
            committed_at,
        );

        Ok(order)
    }

    /// Advance an order's status. Lost updates are impossible: the commit is
    /// conditional on the status read here, and a concurrent move resolves
    /// to `InvalidTransition` on retry rather than a silent overwrite.
    #[instrument(skip(self, principal), fields(actor = %principal.actor_id))]
    pub fn update_order_status(
        &self,
        principal: &Principal,
        order_id: OrderId,
        next: OrderStatus,
    ) -> Result<Order, EngineError> {
        authorize(principal, &known::ORDERS_UPDATE)?;

        let (committed_at, mut order) = self.run_transaction(&[], &[], |_snapshot| {
            let order = self
                .store
                .order(&order_id)?
                .ok_or_else(DomainError::not_found)?;
            let writes = order_admin::plan_status_update(&order, next)?;
            Ok((writes, order))
        })?;

        self.record(
            actions::ORDER_STATUS_UPDATED,
            tables::SALES_ORDERS,
            order_id.to_string(),
            &StatusUpdateDetails {
                order_id,
                from: order.status,
                to: next,
            },
            committed_at,
        );

        order.status = next;
        Ok(order)
    }

    /// Delete an order. Stock deducted at creation stays deducted; the audit
    /// trail keeps the record of what the order was.
    #[instrument(skip(self, principal), fields(actor = %principal.actor_id))]
    pub fn delete_order(
        &self,
        principal: &Principal,
        order_id: OrderId,
    ) -> Result<(), EngineError> {
        authorize(principal, &known::ORDERS_DELETE)?;

        let (committed_at, order) = self.run_transaction(&[], &[], |_snapshot| {
            let order = self
                .store
                .order(&order_id)?
                .ok_or_else(DomainError::not_found)?;
            let writes = order_admin::plan_delete(&order);
            Ok((writes, order))
        })?;

        self.record(
            actions::ORDER_DELETED,
            tables::SALES_ORDERS,
            order_id.to_string(),
            &OrderDeletedDetails {
                order_id,
                customer_name: order.customer_name,
                status: order.status,
            },
            committed_at,
        );

        Ok(())
    }

    // ---- read surface ----

    pub fn stock_entry(
        &self,
        principal: &Principal,
        key: &LedgerKey,
    ) -> Result<Option<StockEntry>, EngineError> {
        authorize(principal, &known::STOCK_READ)?;
        Ok(self.store.ledger_row(key)?)
    }

    pub fn stock_entries(&self, principal: &Principal) -> Result<Vec<StockEntry>, EngineError> {
        authorize(principal, &known::STOCK_READ)?;
        Ok(self.store.ledger_rows()?)
    }

    pub fn product_total(
        &self,
        principal: &Principal,
        product_id: &ProductId,
    ) -> Result<i64, EngineError> {
        authorize(principal, &known::STOCK_READ)?;
        Ok(self.store.total(product_id)?.total_stock)
    }

    pub fn order(
        &self,
        principal: &Principal,
        order_id: &OrderId,
    ) -> Result<Option<Order>, EngineError> {
        authorize(principal, &known::STOCK_READ)?;
        Ok(self.store.order(order_id)?)
    }

    /// All orders, newest first.
    pub fn orders(&self, principal: &Principal) -> Result<Vec<Order>, EngineError> {
        authorize(principal, &known::STOCK_READ)?;
        Ok(self.store.orders()?)
    }

    // ---- reports ----

    pub fn current_stock_report(
        &self,
        principal: &Principal,
        policy: ThresholdPolicy,
    ) -> Result<Report, EngineError> {
        authorize(principal, &known::REPORTS_READ)?;
        let rows = self.store.ledger_rows()?;
        Ok(Report::CurrentStock(reports::current_stock(
            &rows,
            &self.catalog,
            policy,
        )))
    }

    pub fn low_stock_report(
        &self,
        principal: &Principal,
        policy: ThresholdPolicy,
    ) -> Result<Report, EngineError> {
        authorize(principal, &known::REPORTS_READ)?;
        let rows = self.store.ledger_rows()?;
        Ok(Report::LowStock(reports::low_stock(
            &rows,
            &self.catalog,
            policy,
        )))
    }

    /// Movement history, newest first, reconstructed from the audit trail.
    pub fn stock_movement_report(&self, principal: &Principal) -> Result<Report, EngineError> {
        authorize(principal, &known::REPORTS_READ)?;
        let entries = self.audit.store().entries()?;
        Ok(Report::StockMovement(reports::stock_movement(&entries)))
    }

    pub fn inventory_value_report(&self, principal: &Principal) -> Result<Report, EngineError> {
        authorize(principal, &known::REPORTS_READ)?;
        let totals = self.store.totals()?;
        Ok(Report::InventoryValue(reports::inventory_value(
            &totals,
            &self.catalog,
        )))
    }

    /// Raw audit trail, newest first. Admin-only by default role policy.
    pub fn audit_trail(&self, principal: &Principal) -> Result<Vec<AuditEntry>, EngineError> {
        authorize(principal, &known::AUDIT_READ)?;
        Ok(self.audit.store().entries()?)
    }
}
