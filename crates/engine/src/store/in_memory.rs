use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use stockroom_core::{OrderId, ProductId};
use stockroom_ledger::{LedgerKey, ProductTotal, StockEntry};
use stockroom_orders::Order;

use super::r#trait::{
    OrderWrite, StockSnapshot, StockStore, StoreError, VersionedQuantity, WriteSet,
};

#[derive(Debug, Clone)]
struct LedgerRowState {
    quantity: i64,
    version: u64,
    last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
struct TotalRowState {
    total: i64,
    version: u64,
}

#[derive(Debug, Default)]
struct StoreState {
    ledger: BTreeMap<LedgerKey, LedgerRowState>,
    totals: BTreeMap<ProductId, TotalRowState>,
    orders: HashMap<OrderId, Order>,
}

/// In-memory stock store.
///
/// One `RwLock` over the whole state: snapshots are one read acquisition,
/// commits are one write acquisition, so a commit either sees everything a
/// snapshot saw or conflicts on the version checks. Intended for tests/dev
/// and single-process deployments.
#[derive(Debug, Default)]
pub struct InMemoryStockStore {
    state: RwLock<StoreState>,
}

impl InMemoryStockStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> StoreError {
        StoreError::Persistence("lock poisoned".to_string())
    }
}

impl StockStore for InMemoryStockStore {
    fn snapshot(
        &self,
        products: &[ProductId],
        extra_keys: &[LedgerKey],
    ) -> Result<StockSnapshot, StoreError> {
        let state = self.state.read().map_err(|_| Self::poisoned())?;

        let mut snapshot = StockSnapshot::default();

        for (key, row) in &state.ledger {
            if products.contains(&key.product_id) {
                snapshot.ledger.insert(
                    *key,
                    VersionedQuantity {
                        quantity: row.quantity,
                        version: row.version,
                    },
                );
            }
        }

        for key in extra_keys {
            let vq = state
                .ledger
                .get(key)
                .map(|row| VersionedQuantity {
                    quantity: row.quantity,
                    version: row.version,
                })
                .unwrap_or_default();
            snapshot.ledger.insert(*key, vq);
        }

        for product_id in products {
            let vq = state
                .totals
                .get(product_id)
                .map(|row| VersionedQuantity {
                    quantity: row.total,
                    version: row.version,
                })
                .unwrap_or_default();
            snapshot.totals.insert(*product_id, vq);
        }

        Ok(snapshot)
    }

    fn commit(&self, writes: WriteSet) -> Result<DateTime<Utc>, StoreError> {
        let mut state = self.state.write().map_err(|_| Self::poisoned())?;
        let now = Utc::now();

        // Validate everything before touching anything: the whole set
        // applies or none of it does.
        for w in &writes.ledger {
            let current = state.ledger.get(&w.key).map(|r| r.version).unwrap_or(0);
            if current != w.expected_version {
                return Err(StoreError::Conflict(format!(
                    "ledger row {:?} at version {current}, expected {}",
                    w.key, w.expected_version
                )));
            }
            if w.new_quantity < 0 {
                return Err(StoreError::InvalidWrite(format!(
                    "negative quantity for ledger row {:?}",
                    w.key
                )));
            }
        }

        for t in &writes.totals {
            let current = state
                .totals
                .get(&t.product_id)
                .map(|r| r.version)
                .unwrap_or(0);
            if current != t.expected_version {
                return Err(StoreError::Conflict(format!(
                    "product total {} at version {current}, expected {}",
                    t.product_id, t.expected_version
                )));
            }
            if t.new_total < 0 {
                return Err(StoreError::InvalidWrite(format!(
                    "negative total for product {}",
                    t.product_id
                )));
            }
        }

        match &writes.order {
            Some(OrderWrite::Insert(order)) => {
                if state.orders.contains_key(&order.id) {
                    return Err(StoreError::InvalidWrite(format!(
                        "duplicate order id {}",
                        order.id
                    )));
                }
            }
            Some(OrderWrite::SetStatus {
                order_id, expected, ..
            }) => match state.orders.get(order_id) {
                None => {
                    return Err(StoreError::Conflict(format!(
                        "order {order_id} no longer exists"
                    )));
                }
                Some(order) if order.status != *expected => {
                    return Err(StoreError::Conflict(format!(
                        "order {order_id} status is {}, expected {}",
                        order.status, expected
                    )));
                }
                Some(_) => {}
            },
            Some(OrderWrite::Delete { order_id }) => {
                if !state.orders.contains_key(order_id) {
                    return Err(StoreError::Conflict(format!(
                        "order {order_id} no longer exists"
                    )));
                }
            }
            None => {}
        }

        // Apply. Ledger writes go in fixed key order regardless of how the
        // planner produced them.
        let mut ledger_writes = writes.ledger;
        ledger_writes.sort_by_key(|w| w.key);
        for w in ledger_writes {
            let row = state.ledger.entry(w.key).or_insert(LedgerRowState {
                quantity: 0,
                version: 0,
                last_updated: now,
            });
            row.quantity = w.new_quantity;
            row.version += 1;
            row.last_updated = now;
        }

        for t in writes.totals {
            let row = state.totals.entry(t.product_id).or_default();
            row.total = t.new_total;
            row.version += 1;
        }

        match writes.order {
            Some(OrderWrite::Insert(order)) => {
                state.orders.insert(order.id, order);
            }
            Some(OrderWrite::SetStatus { order_id, next, .. }) => {
                if let Some(order) = state.orders.get_mut(&order_id) {
                    order.status = next;
                }
            }
            Some(OrderWrite::Delete { order_id }) => {
                state.orders.remove(&order_id);
            }
            None => {}
        }

        Ok(now)
    }

    fn ledger_row(&self, key: &LedgerKey) -> Result<Option<StockEntry>, StoreError> {
        let state = self.state.read().map_err(|_| Self::poisoned())?;
        Ok(state.ledger.get(key).map(|row| StockEntry {
            product_id: key.product_id,
            warehouse_id: key.warehouse_id,
            quantity: row.quantity,
            last_updated: row.last_updated,
        }))
    }

    fn ledger_rows(&self) -> Result<Vec<StockEntry>, StoreError> {
        let state = self.state.read().map_err(|_| Self::poisoned())?;
        Ok(state
            .ledger
            .iter()
            .map(|(key, row)| StockEntry {
                product_id: key.product_id,
                warehouse_id: key.warehouse_id,
                quantity: row.quantity,
                last_updated: row.last_updated,
            })
            .collect())
    }

    fn total(&self, product_id: &ProductId) -> Result<ProductTotal, StoreError> {
        let state = self.state.read().map_err(|_| Self::poisoned())?;
        Ok(ProductTotal {
            product_id: *product_id,
            total_stock: state.totals.get(product_id).map(|r| r.total).unwrap_or(0),
        })
    }

    fn totals(&self) -> Result<Vec<ProductTotal>, StoreError> {
        let state = self.state.read().map_err(|_| Self::poisoned())?;
        Ok(state
            .totals
            .iter()
            .map(|(product_id, row)| ProductTotal {
                product_id: *product_id,
                total_stock: row.total,
            })
            .collect())
    }

    fn order(&self, order_id: &OrderId) -> Result<Option<Order>, StoreError> {
        let state = self.state.read().map_err(|_| Self::poisoned())?;
        Ok(state.orders.get(order_id).cloned())
    }

    fn orders(&self) -> Result<Vec<Order>, StoreError> {
        let state = self.state.read().map_err(|_| Self::poisoned())?;
        let mut orders: Vec<Order> = state.orders.values().cloned().collect();
        orders.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(orders)
    }
}
