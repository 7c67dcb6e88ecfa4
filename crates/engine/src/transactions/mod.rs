//! Transaction planners.
//!
//! Each mutating operation is a pure planning function: validate the
//! command, then turn one [`StockSnapshot`](crate::store::StockSnapshot)
//! into a [`WriteSet`](crate::store::WriteSet). The engine facade runs the
//! plan inside its snapshot/commit retry loop; planners never touch storage
//! themselves, which keeps every business rule unit-testable without a
//! store.
//!
//! Each module also defines the typed detail struct its audit entry carries.

pub mod fulfillment;
pub mod order_admin;
pub mod restock;
pub mod transfer;
