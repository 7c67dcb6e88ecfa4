use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::permissions::{Permission, known};

/// Role identifier used for RBAC.
///
/// Roles are opaque strings at this layer; the built-in
/// [`role_permissions`] policy covers the three roles the system ships with,
/// and unknown roles simply resolve to no permissions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const ADMIN: Role = Role(Cow::Borrowed("admin"));
    pub const MANAGER: Role = Role(Cow::Borrowed("manager"));
    pub const STAFF: Role = Role(Cow::Borrowed("staff"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Built-in role → permission policy.
///
/// Admins see everything including the audit log, managers run stock and
/// order operations and reports, staff get read-only views.
pub fn role_permissions(role: &Role) -> Vec<Permission> {
    match role.as_str() {
        "admin" => vec![known::WILDCARD],
        "manager" => vec![
            known::STOCK_READ,
            known::STOCK_RESTOCK,
            known::STOCK_TRANSFER,
            known::ORDERS_CREATE,
            known::ORDERS_UPDATE,
            known::ORDERS_DELETE,
            known::REPORTS_READ,
        ],
        "staff" => vec![known::STOCK_READ, known::REPORTS_READ],
        _ => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_gets_the_wildcard() {
        let perms = role_permissions(&Role::ADMIN);
        assert!(perms.iter().any(|p| p.is_wildcard()));
    }

    #[test]
    fn unknown_roles_get_nothing() {
        assert!(role_permissions(&Role::new("intern")).is_empty());
    }
}
