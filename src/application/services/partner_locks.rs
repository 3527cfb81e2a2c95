//! Per-partner serialization of limit changes

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// Registry of per-partner async mutexes.
///
/// Serializes read-modify-write cycles on one partner inside this process.
/// Entries are removed once nobody holds or waits on them.
#[derive(Default)]
pub struct PartnerLocks {
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

/// Held while a partner is being modified.
pub struct PartnerLockGuard<'a> {
    registry: &'a PartnerLocks,
    partner_id: Uuid,
    guard: Option<OwnedMutexGuard<()>>,
}

impl PartnerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, partner_id: Uuid) -> PartnerLockGuard<'_> {
        let lock = self.locks.entry(partner_id).or_default().clone();
        let guard = lock.lock_owned().await;
        PartnerLockGuard {
            registry: self,
            partner_id,
            guard: Some(guard),
        }
    }

    /// Number of partners with a live lock entry.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl Drop for PartnerLockGuard<'_> {
    fn drop(&mut self) {
        // Release the mutex first so the map holds the only other reference.
        self.guard.take();
        self.registry
            .locks
            .remove_if(&self.partner_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}
