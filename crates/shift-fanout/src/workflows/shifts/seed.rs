use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use super::domain::{Shift, ShiftId, Worker};
use super::repository::{InMemoryShiftStore, RepositoryError};

/// Shifts and workers loaded at startup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub shifts: Vec<Shift>,
    #[serde(default, alias = "caregivers")]
    pub workers: Vec<Worker>,
}

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("unable to read seed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed seed document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Conflict(#[from] RepositoryError),
    #[error("shift {0} has an assignment that does not match its status")]
    InconsistentShift(ShiftId),
}

impl SeedData {
    pub fn from_reader<Rd: Read>(reader: Rd) -> Result<Self, SeedError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Build a store preserving document order. Duplicate ids, duplicate
    /// contact numbers and half-filled shifts are rejected.
    pub fn into_store(self) -> Result<InMemoryShiftStore, SeedError> {
        let store = InMemoryShiftStore::new();
        for shift in self.shifts {
            if !shift.is_consistent() {
                return Err(SeedError::InconsistentShift(shift.id));
            }
            store.insert_shift(shift)?;
        }
        for worker in self.workers {
            store.insert_worker(worker)?;
        }
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::shifts::domain::{Certification, ShiftStatus, WorkerId};
    use crate::workflows::shifts::repository::ShiftRepository;

    const DOCUMENT: &str = r#"{
        "shifts": [
            {"id": "S1", "role_required": "RN", "organization_id": "org-1"},
            {"id": "S2", "required_role": "CNA", "status": "FILLED", "assigned_worker_id": "W2"}
        ],
        "caregivers": [
            {"id": "W1", "name": "Ada", "phone": "555-1", "role": "RN"},
            {"id": "W2", "name": "Grace", "phone": "555-2", "role": "CNA"}
        ]
    }"#;

    #[test]
    fn loads_shifts_and_workers_in_order() {
        let store = SeedData::from_reader(DOCUMENT.as_bytes())
            .expect("seed parses")
            .into_store()
            .expect("seed loads");

        let shifts = store.shifts().expect("list");
        assert_eq!(shifts.len(), 2);
        assert_eq!(shifts[0].required_role, Certification::RegisteredNurse);
        assert_eq!(shifts[1].status, ShiftStatus::Filled);
        assert_eq!(shifts[1].assigned_worker_id, Some(WorkerId::new("W2")));
        assert!(store.worker_by_contact("555-1").expect("lookup").is_some());
    }

    #[test]
    fn rejects_filled_shift_without_assignment() {
        let document = r#"{"shifts": [{"id": "S1", "required_role": "RN", "status": "FILLED"}]}"#;
        let err = SeedData::from_reader(document.as_bytes())
            .expect("seed parses")
            .into_store()
            .expect_err("inconsistent shift");
        assert!(matches!(err, SeedError::InconsistentShift(id) if id == ShiftId::new("S1")));
    }

    #[test]
    fn rejects_duplicate_contacts() {
        let document = r#"{"workers": [
            {"id": "W1", "name": "Ada", "phone": "555-1", "role": "RN"},
            {"id": "W2", "name": "Bea", "phone": "555-1", "role": "LPN"}
        ]}"#;
        let err = SeedData::from_reader(document.as_bytes())
            .expect("seed parses")
            .into_store()
            .expect_err("duplicate contact");
        assert!(matches!(err, SeedError::Conflict(RepositoryError::Conflict(_))));
    }

    #[test]
    fn unknown_role_is_a_parse_error() {
        let document = r#"{"shifts": [{"id": "S1", "required_role": "MD"}]}"#;
        let err = SeedData::from_reader(document.as_bytes()).expect_err("unknown role");
        assert!(matches!(err, SeedError::Parse(_)));
    }
}
