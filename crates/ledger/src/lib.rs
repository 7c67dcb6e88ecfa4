//! Stock ledger domain types.
//!
//! The ledger row — one quantity per (product, warehouse) pair — is the unit
//! of stock truth. `ProductTotal` is the denormalized per-product sum kept in
//! lockstep with the rows by the engine's transactions. Everything here is
//! pure data + deterministic rules (no IO, no storage).

pub mod entry;
pub mod threshold;

pub use entry::{LedgerKey, ProductTotal, StockEntry, apply_delta};
pub use threshold::{DEFAULT_LOW_STOCK_THRESHOLD, ThresholdPolicy, is_low};
