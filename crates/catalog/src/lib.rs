//! Product and warehouse reference data.
//!
//! The engine treats this as an external collaborator: it reads identity,
//! cost prices and per-product low-stock thresholds, but never writes here.

pub mod product;
pub mod store;
pub mod warehouse;

pub use product::Product;
pub use store::{Catalog, InMemoryCatalog};
pub use warehouse::Warehouse;
