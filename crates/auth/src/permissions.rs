use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// Permissions are modeled as opaque strings (e.g. "stock.transfer").
/// A special wildcard permission `"*"` means "allow all".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == "*"
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Permissions the engine checks at its operation boundary.
pub mod known {
    use super::Permission;

    pub const WILDCARD: Permission = Permission::from_static("*");
    pub const STOCK_READ: Permission = Permission::from_static("stock.read");
    pub const STOCK_RESTOCK: Permission = Permission::from_static("stock.restock");
    pub const STOCK_TRANSFER: Permission = Permission::from_static("stock.transfer");
    pub const ORDERS_CREATE: Permission = Permission::from_static("orders.create");
    pub const ORDERS_UPDATE: Permission = Permission::from_static("orders.update");
    pub const ORDERS_DELETE: Permission = Permission::from_static("orders.delete");
    pub const REPORTS_READ: Permission = Permission::from_static("reports.read");
    pub const AUDIT_READ: Permission = Permission::from_static("audit.read");
}
