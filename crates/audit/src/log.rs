use std::collections::VecDeque;
use std::sync::{Arc, Mutex, RwLock};

use thiserror::Error;
use tracing::warn;

use crate::entry::AuditEntry;

/// Audit store operation error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuditLogError {
    #[error("audit append failed: {0}")]
    Append(String),

    #[error("audit read failed: {0}")]
    Read(String),
}

/// Append-only audit entry store.
///
/// Entries are immutable once written; implementations expose no update or
/// delete operation.
pub trait AuditStore: Send + Sync {
    fn append(&self, entry: AuditEntry) -> Result<(), AuditLogError>;

    /// All entries, newest first.
    fn entries(&self) -> Result<Vec<AuditEntry>, AuditLogError>;
}

impl<S> AuditStore for Arc<S>
where
    S: AuditStore + ?Sized,
{
    fn append(&self, entry: AuditEntry) -> Result<(), AuditLogError> {
        (**self).append(entry)
    }

    fn entries(&self) -> Result<Vec<AuditEntry>, AuditLogError> {
        (**self).entries()
    }
}

/// In-memory append-only audit store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryAuditStore {
    entries: RwLock<Vec<AuditEntry>>,
}

impl InMemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditStore for InMemoryAuditStore {
    fn append(&self, entry: AuditEntry) -> Result<(), AuditLogError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| AuditLogError::Append("lock poisoned".to_string()))?;
        entries.push(entry);
        Ok(())
    }

    fn entries(&self) -> Result<Vec<AuditEntry>, AuditLogError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| AuditLogError::Read("lock poisoned".to_string()))?;
        let mut out = entries.clone();
        out.sort_by(|a, b| (b.recorded_at, b.id).cmp(&(a.recorded_at, a.id)));
        Ok(out)
    }
}

/// Best-effort, at-least-once submission front for an [`AuditStore`].
///
/// A failed append parks the entry in a pending queue instead of surfacing
/// the error; the queue is drained oldest-first before the next entry goes
/// through, so ordering is preserved across store hiccups.
#[derive(Debug)]
pub struct AuditRecorder<S> {
    store: S,
    pending: Mutex<VecDeque<AuditEntry>>,
}

impl<S> AuditRecorder<S>
where
    S: AuditStore,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            pending: Mutex::new(VecDeque::new()),
        }
    }

    /// Submit an entry. Never fails from the caller's point of view.
    pub fn submit(&self, entry: AuditEntry) {
        let Ok(mut pending) = self.pending.lock() else {
            warn!("audit pending queue lock poisoned; dropping retry buffer access");
            let _ = self.store.append(entry);
            return;
        };
        pending.push_back(entry);

        // Drain in arrival order; stop at the first failure and keep the
        // rest parked for the next submission.
        while let Some(next) = pending.front() {
            match self.store.append(next.clone()) {
                Ok(()) => {
                    pending.pop_front();
                }
                Err(e) => {
                    warn!(error = %e, queued = pending.len(), "audit append failed; entry parked for retry");
                    break;
                }
            }
        }
    }

    /// Entries still waiting on a successful append.
    pub fn pending_len(&self) -> usize {
        self.pending.lock().map(|p| p.len()).unwrap_or(0)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
