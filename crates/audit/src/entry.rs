use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// One immutable audit record.
///
/// `details` is a JSON payload; mutating operations serialize a typed detail
/// struct into it, and the movement report deserializes it back by `action`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub action: String,
    pub table_name: String,
    pub record_id: String,
    pub details: JsonValue,
    pub recorded_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(
        action: impl Into<String>,
        table_name: impl Into<String>,
        record_id: impl Into<String>,
        details: JsonValue,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            // UUIDv7: time-ordered, so ids double as a tiebreaker for
            // entries sharing a timestamp.
            id: Uuid::now_v7(),
            action: action.into(),
            table_name: table_name.into(),
            record_id: record_id.into(),
            details,
            recorded_at,
        }
    }
}

/// Action names used by the engine's operations.
pub mod actions {
    pub const STOCK_RESTOCKED: &str = "stock.restocked";
    pub const STOCK_TRANSFERRED: &str = "stock.transferred";
    pub const ORDER_FULFILLED: &str = "order.fulfilled";
    pub const ORDER_STATUS_UPDATED: &str = "order.status_updated";
    pub const ORDER_DELETED: &str = "order.deleted";
}

/// Logical table names, mirroring the reporting store's schema.
pub mod tables {
    pub const STOCK_ENTRIES: &str = "stock_entries";
    pub const STOCK_TRANSFERS: &str = "stock_transfers";
    pub const SALES_ORDERS: &str = "sales_orders";
}
