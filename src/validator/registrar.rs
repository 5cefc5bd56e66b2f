//! Directory registrar seam.
//!
//! Other subsystems find active validators through the process-wide
//! directory. The lifecycle manager is the only writer; registration
//! happens strictly after the local registry insert, and deregistration
//! strictly before local removal, so well-behaved directory callers never
//! observe an instance that is about to be finalized.

use std::sync::Arc;

use dashmap::DashMap;

use super::Validator;
use crate::config::EntryId;

/// Process-wide lookup service for active validators.
///
/// Injected into the lifecycle manager at construction; created at server
/// startup and torn down at shutdown.
pub trait DirectoryRegistrar: Send + Sync {
    fn register(&self, id: &EntryId, validator: Arc<dyn Validator>);

    /// Removes a registration. Must be idempotent: deregistering an unknown
    /// id is a no-op.
    fn deregister(&self, id: &EntryId);
}

/// In-process directory backed by a concurrent map.
#[derive(Default)]
pub struct InProcessDirectory {
    entries: DashMap<EntryId, Arc<dyn Validator>>,
}

impl InProcessDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, id: &EntryId) -> Option<Arc<dyn Validator>> {
        self.entries.get(id).map(|e| Arc::clone(e.value()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<EntryId> {
        let mut ids: Vec<EntryId> = self.entries.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }
}

impl DirectoryRegistrar for InProcessDirectory {
    fn register(&self, id: &EntryId, validator: Arc<dyn Validator>) {
        self.entries.insert(id.clone(), validator);
    }

    fn deregister(&self, id: &EntryId) {
        self.entries.remove(id);
    }
}

impl std::fmt::Debug for InProcessDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InProcessDirectory")
            .field("entries", &self.ids())
            .finish()
    }
}
