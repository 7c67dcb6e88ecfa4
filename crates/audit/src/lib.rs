//! Append-only audit trail.
//!
//! Every mutating engine operation submits one entry describing what it did.
//! The trail is a best-effort, at-least-once side channel: an append failure
//! never rolls back or blocks the business transaction that triggered it.

pub mod entry;
pub mod log;

pub use entry::{AuditEntry, actions, tables};
pub use log::{AuditLogError, AuditRecorder, AuditStore, InMemoryAuditStore};
