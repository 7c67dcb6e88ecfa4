use serde::{Deserialize, Serialize};

use stockroom_core::{ActorId, DomainError, DomainResult};

use crate::permissions::Permission;
use crate::roles::{Role, role_permissions};

/// A resolved caller: actor identity plus the role the session layer
/// supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub actor_id: ActorId,
    pub role: Role,
}

impl Principal {
    pub fn new(actor_id: ActorId, role: Role) -> Self {
        Self { actor_id, role }
    }
}

/// Authorize a principal for one permission.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(principal: &Principal, required: &Permission) -> DomainResult<()> {
    let granted = role_permissions(&principal.role);
    if granted
        .iter()
        .any(|p| p.is_wildcard() || p == required)
    {
        Ok(())
    } else {
        Err(DomainError::Unauthorized)
    }
}
