//! Storage boundary for ledger rows, product totals and orders.
//!
//! This module states what the engine requires from the durable substrate —
//! a consistent multi-row snapshot and an all-or-nothing versioned commit —
//! without making storage assumptions. The in-memory implementation serves
//! tests/dev and single-process deployments; a SQL backend would implement
//! the same trait over real transactions.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryStockStore;
pub use r#trait::{
    LedgerWrite, OrderWrite, StockSnapshot, StockStore, StoreError, TotalWrite,
    VersionedQuantity, WriteSet,
};
