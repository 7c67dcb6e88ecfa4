use thiserror::Error;

use stockroom_audit::AuditLogError;
use stockroom_core::DomainError;

use crate::store::StoreError;

/// Error surfaced by engine operations.
///
/// Domain failures (validation, insufficient stock, lifecycle rules,
/// authorization) pass through unchanged; `Conflict` means the bounded
/// internal retry budget ran out and the caller may resubmit.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Commit kept conflicting after the retry budget; safe to resubmit.
    #[error("operation conflicted after retries: {0}")]
    Conflict(String),

    /// Non-retryable store failure.
    #[error(transparent)]
    Store(StoreError),

    /// Audit trail read failure. Appends never surface here; only the
    /// audit-trail read path reports this.
    #[error(transparent)]
    Audit(#[from] AuditLogError),
}

impl From<StoreError> for EngineError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Conflict(msg) => EngineError::Conflict(msg),
            other => EngineError::Store(other),
        }
    }
}

impl EngineError {
    /// Convenience for callers rendering shortfall messages.
    pub fn is_insufficient_stock(&self) -> bool {
        matches!(self, EngineError::Domain(DomainError::InsufficientStock { .. }))
    }
}
