//! Inventory consistency & fulfillment engine.
//!
//! This crate composes the pure domain crates into the transactional
//! operation surface: restock, transfer, order fulfillment, order lifecycle
//! administration and the read-only reports. All mutation goes through the
//! [`store::StockStore`] seam as a snapshot → plan → versioned-commit cycle,
//! retried a bounded number of times on conflict.

pub mod engine;
pub mod error;
pub mod reports;
pub mod store;
pub mod transactions;


pub use engine::{DEFAULT_MAX_RETRIES, InventoryEngine};
pub use error::EngineError;
pub use reports::{total_inventory_value, MovementRow, Report, StockReportRow, ValuationRow};
pub use store::{InMemoryStockStore, StockSnapshot, StockStore, StoreError, WriteSet};
pub use transactions::fulfillment::CreateOrderCommand;
pub use transactions::restock::RestockCommand;
pub use transactions::transfer::TransferCommand;
