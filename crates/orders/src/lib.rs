//! Sales order domain: order + items + status lifecycle.
//!
//! Orders come into existence only through a successful fulfillment
//! transaction; this crate holds the pure rules (item validation, forward-only
//! status transitions), not the stock deduction itself.

pub mod order;

pub use order::{Order, OrderItem, OrderStatus};
