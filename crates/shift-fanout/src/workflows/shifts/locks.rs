use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::debug;

use super::domain::ShiftId;

/// One async mutex per shift id, created on first reference and kept for the
/// life of the registry.
///
/// The outer `std::sync::Mutex` only guards the get-or-create step and is
/// never held across an `.await`, so two simultaneous first touches of the
/// same id always observe the same lock. Guards are not reentrant: acquiring
/// the same shift twice on one task deadlocks.
#[derive(Debug, Default)]
pub struct ShiftLockRegistry {
    locks: Mutex<HashMap<ShiftId, Arc<AsyncMutex<()>>>>,
}

/// Exclusive claim on a single shift. Dropping it releases the shift.
#[derive(Debug)]
pub struct ShiftGuard {
    shift_id: ShiftId,
    _guard: OwnedMutexGuard<()>,
}

impl ShiftGuard {
    pub fn shift_id(&self) -> &ShiftId {
        &self.shift_id
    }
}

impl Drop for ShiftGuard {
    fn drop(&mut self) {
        debug!(shift_id = %self.shift_id, "shift lock released");
    }
}

impl ShiftLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, shift_id: &ShiftId) -> Arc<AsyncMutex<()>> {
        // A poisoned map still holds valid Arcs; nothing is mid-update while
        // the guard is held beyond a single insert.
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        locks
            .entry(shift_id.clone())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    pub async fn acquire(&self, shift_id: &ShiftId) -> ShiftGuard {
        let lock = self.lock_for(shift_id);
        let guard = lock.lock_owned().await;
        debug!(shift_id = %shift_id, "shift lock acquired");
        ShiftGuard {
            shift_id: shift_id.clone(),
            _guard: guard,
        }
    }

    /// Number of shift ids that have been locked at least once.
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, shift_id: &ShiftId) -> bool {
        self.locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains_key(shift_id)
    }
}
