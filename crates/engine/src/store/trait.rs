use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use stockroom_core::{OrderId, ProductId};
use stockroom_ledger::{LedgerKey, ProductTotal, StockEntry};
use stockroom_orders::{Order, OrderStatus};

/// Quantity plus the row version it was read at.
///
/// Version 0 with quantity 0 stands for an absent row; a commit that expects
/// version 0 therefore also asserts the row has not been created in the
/// meantime.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct VersionedQuantity {
    pub quantity: i64,
    pub version: u64,
}

/// One consistent view of every row a transaction will touch.
///
/// Taken under a single read critical section, so the availability check and
/// the writes planned from it derive from the same state; the commit's
/// version checks detect anything that moved afterwards.
#[derive(Debug, Clone, Default)]
pub struct StockSnapshot {
    pub ledger: BTreeMap<LedgerKey, VersionedQuantity>,
    pub totals: BTreeMap<ProductId, VersionedQuantity>,
}

impl StockSnapshot {
    /// Ledger row at `key`, absent rows reading as (0, version 0).
    pub fn ledger_row(&self, key: &LedgerKey) -> VersionedQuantity {
        self.ledger.get(key).copied().unwrap_or_default()
    }

    /// Product total, absent totals reading as (0, version 0).
    pub fn total(&self, product_id: &ProductId) -> VersionedQuantity {
        self.totals.get(product_id).copied().unwrap_or_default()
    }

    /// The snapshot's ledger rows for one product, in fixed key order.
    pub fn product_rows(
        &self,
        product_id: &ProductId,
    ) -> impl Iterator<Item = (&LedgerKey, &VersionedQuantity)> {
        let product_id = *product_id;
        self.ledger
            .iter()
            .filter(move |(key, _)| key.product_id == product_id)
    }
}

/// Compare-and-swap write of one ledger row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerWrite {
    pub key: LedgerKey,
    pub expected_version: u64,
    pub new_quantity: i64,
}

/// Compare-and-swap write of one product total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalWrite {
    pub product_id: ProductId,
    pub expected_version: u64,
    pub new_total: i64,
}

/// Order mutation carried by a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderWrite {
    /// Insert a new order with its items (fulfillment).
    Insert(Order),
    /// Advance the status, conditional on the status the planner saw.
    SetStatus {
        order_id: OrderId,
        expected: OrderStatus,
        next: OrderStatus,
    },
    /// Remove the order and its items. No stock reversal.
    Delete { order_id: OrderId },
}

/// Everything one transaction commits, as a single atomic unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSet {
    pub ledger: Vec<LedgerWrite>,
    pub totals: Vec<TotalWrite>,
    pub order: Option<OrderWrite>,
}

impl WriteSet {
    pub fn is_empty(&self) -> bool {
        self.ledger.is_empty() && self.totals.is_empty() && self.order.is_none()
    }
}

/// Stock store operation error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A version (or order status) check failed: some row moved between
    /// snapshot and commit. Retryable with a fresh snapshot.
    #[error("stale write: {0}")]
    Conflict(String),

    /// The write set itself is unacceptable (negative quantity, duplicate
    /// order id). Not retryable.
    #[error("invalid write: {0}")]
    InvalidWrite(String),

    /// The substrate failed. Fatal to the operation, surfaced as-is.
    #[error("persistence failure: {0}")]
    Persistence(String),
}

/// Durable substrate seam.
///
/// Implementations must provide:
/// - `snapshot`: one consistent read of the named rows (no torn reads);
/// - `commit`: verify every expected version and the order-status condition
///   under one exclusive critical section, reject any write that would make
///   a quantity negative, then apply the whole set or none of it. Ledger
///   writes are applied in `LedgerKey` order (warehouse id, then product id)
///   regardless of the order the planner produced them in.
pub trait StockStore: Send + Sync {
    /// Consistent snapshot of all ledger rows + totals for `products`, plus
    /// the rows named by `extra_keys` (which may not exist yet).
    fn snapshot(
        &self,
        products: &[ProductId],
        extra_keys: &[LedgerKey],
    ) -> Result<StockSnapshot, StoreError>;

    /// Apply a write set atomically. Returns the commit timestamp.
    fn commit(&self, writes: WriteSet) -> Result<DateTime<Utc>, StoreError>;

    fn ledger_row(&self, key: &LedgerKey) -> Result<Option<StockEntry>, StoreError>;

    /// All ledger rows, in fixed key order.
    fn ledger_rows(&self) -> Result<Vec<StockEntry>, StoreError>;

    /// Denormalized total for one product (0 if never stocked).
    fn total(&self, product_id: &ProductId) -> Result<ProductTotal, StoreError>;

    /// All product totals.
    fn totals(&self) -> Result<Vec<ProductTotal>, StoreError>;

    fn order(&self, order_id: &OrderId) -> Result<Option<Order>, StoreError>;

    /// All orders, newest first.
    fn orders(&self) -> Result<Vec<Order>, StoreError>;
}

impl<S> StockStore for Arc<S>
where
    S: StockStore + ?Sized,
{
    fn snapshot(
        &self,
        products: &[ProductId],
        extra_keys: &[LedgerKey],
    ) -> Result<StockSnapshot, StoreError> {
        (**self).snapshot(products, extra_keys)
    }

    fn commit(&self, writes: WriteSet) -> Result<DateTime<Utc>, StoreError> {
        (**self).commit(writes)
    }

    fn ledger_row(&self, key: &LedgerKey) -> Result<Option<StockEntry>, StoreError> {
        (**self).ledger_row(key)
    }

    fn ledger_rows(&self) -> Result<Vec<StockEntry>, StoreError> {
        (**self).ledger_rows()
    }

    fn total(&self, product_id: &ProductId) -> Result<ProductTotal, StoreError> {
        (**self).total(product_id)
    }

    fn totals(&self) -> Result<Vec<ProductTotal>, StoreError> {
        (**self).totals()
    }

    fn order(&self, order_id: &OrderId) -> Result<Option<Order>, StoreError> {
        (**self).order(order_id)
    }

    fn orders(&self) -> Result<Vec<Order>, StoreError> {
        (**self).orders()
    }
}
