use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::domain::{Certification, Shift, ShiftId, Worker};

/// Storage abstraction so the engine can be exercised against fakes.
///
/// Write paths that decide an outcome (fanout start, claim) only call
/// [`ShiftRepository::save_shift`] while holding that shift's lock; the
/// repository itself does not serialize them.
pub trait ShiftRepository: Send + Sync {
    fn fetch_shift(&self, id: &ShiftId) -> Result<Option<Shift>, RepositoryError>;
    fn save_shift(&self, shift: Shift) -> Result<(), RepositoryError>;
    /// Open shifts requiring `role`, earliest-loaded first.
    fn open_shifts_for_role(&self, role: Certification) -> Result<Vec<Shift>, RepositoryError>;
    /// First worker registered with `phone`, in load order.
    fn worker_by_contact(&self, phone: &str) -> Result<Option<Worker>, RepositoryError>;
    fn workers_with_role(&self, role: Certification) -> Result<Vec<Worker>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists: {0}")]
    Conflict(String),
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Default)]
struct StoreState {
    shifts: HashMap<ShiftId, Shift>,
    shift_order: Vec<ShiftId>,
    workers: Vec<Worker>,
}

/// Process-local shift store. Enumeration follows insertion order so the
/// claim tie-break is reproducible.
#[derive(Debug, Default)]
pub struct InMemoryShiftStore {
    state: RwLock<StoreState>,
}

impl InMemoryShiftStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreState>, RepositoryError> {
        self.state
            .read()
            .map_err(|_| RepositoryError::Unavailable("shift store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState>, RepositoryError> {
        self.state
            .write()
            .map_err(|_| RepositoryError::Unavailable("shift store lock poisoned".to_string()))
    }

    pub fn insert_shift(&self, shift: Shift) -> Result<(), RepositoryError> {
        let mut state = self.write()?;
        if state.shifts.contains_key(&shift.id) {
            return Err(RepositoryError::Conflict(format!("shift {}", shift.id)));
        }
        state.shift_order.push(shift.id.clone());
        state.shifts.insert(shift.id.clone(), shift);
        Ok(())
    }

    /// Duplicate worker ids and duplicate contact numbers are both rejected.
    pub fn insert_worker(&self, worker: Worker) -> Result<(), RepositoryError> {
        let mut state = self.write()?;
        if let Some(existing) = state
            .workers
            .iter()
            .find(|existing| existing.id == worker.id || existing.phone == worker.phone)
        {
            let detail = if existing.id == worker.id {
                format!("worker {}", worker.id)
            } else {
                format!("contact {} (already used by {})", worker.phone, existing.id)
            };
            return Err(RepositoryError::Conflict(detail));
        }
        state.workers.push(worker);
        Ok(())
    }

    /// Snapshot of every shift in load order.
    pub fn shifts(&self) -> Result<Vec<Shift>, RepositoryError> {
        let state = self.read()?;
        Ok(state
            .shift_order
            .iter()
            .filter_map(|id| state.shifts.get(id).cloned())
            .collect())
    }

    pub fn worker_count(&self) -> Result<usize, RepositoryError> {
        Ok(self.read()?.workers.len())
    }
}

impl ShiftRepository for InMemoryShiftStore {
    fn fetch_shift(&self, id: &ShiftId) -> Result<Option<Shift>, RepositoryError> {
        Ok(self.read()?.shifts.get(id).cloned())
    }

    fn save_shift(&self, shift: Shift) -> Result<(), RepositoryError> {
        debug_assert!(
            shift.is_consistent(),
            "shift {} assigned without FILLED status",
            shift.id
        );
        let mut state = self.write()?;
        match state.shifts.get_mut(&shift.id) {
            Some(slot) => {
                *slot = shift;
                Ok(())
            }
            None => Err(RepositoryError::NotFound(format!("shift {}", shift.id))),
        }
    }

    fn open_shifts_for_role(&self, role: Certification) -> Result<Vec<Shift>, RepositoryError> {
        let state = self.read()?;
        Ok(state
            .shift_order
            .iter()
            .filter_map(|id| state.shifts.get(id))
            .filter(|shift| shift.required_role == role && shift.is_open())
            .cloned()
            .collect())
    }

    fn worker_by_contact(&self, phone: &str) -> Result<Option<Worker>, RepositoryError> {
        let state = self.read()?;
        Ok(state
            .workers
            .iter()
            .find(|worker| worker.phone == phone)
            .cloned())
    }

    fn workers_with_role(&self, role: Certification) -> Result<Vec<Worker>, RepositoryError> {
        let state = self.read()?;
        Ok(state
            .workers
            .iter()
            .filter(|worker| worker.role == role)
            .cloned()
            .collect())
    }
}
