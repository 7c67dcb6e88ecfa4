//! Role-based authorization for engine operations.
//!
//! The session layer resolves a user to a [`Principal`] (actor + role); the
//! engine checks permissions itself rather than relying on whatever the
//! presentation layer chose to hide.

pub mod authorize;
pub mod permissions;
pub mod roles;

pub use authorize::{Principal, authorize};
pub use permissions::Permission;
pub use roles::{Role, role_permissions};
