use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for shifts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShiftId(pub String);

impl ShiftId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShiftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for workers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerId(pub String);

impl WorkerId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Certification a worker holds and a shift requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Certification {
    #[serde(rename = "RN")]
    RegisteredNurse,
    #[serde(rename = "LPN")]
    LicensedPracticalNurse,
    #[serde(rename = "CNA")]
    CertifiedNursingAssistant,
}

impl Certification {
    pub fn code(self) -> &'static str {
        match self {
            Certification::RegisteredNurse => "RN",
            Certification::LicensedPracticalNurse => "LPN",
            Certification::CertifiedNursingAssistant => "CNA",
        }
    }
}

impl fmt::Display for Certification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftStatus {
    #[default]
    Open,
    Filled,
}

impl ShiftStatus {
    pub fn label(self) -> &'static str {
        match self {
            ShiftStatus::Open => "OPEN",
            ShiftStatus::Filled => "FILLED",
        }
    }
}

/// A unit of work requiring one worker with a matching certification.
///
/// `assigned_worker_id` is populated exactly when the shift is filled, and
/// `fanout_started` only ever moves from `false` to `true`. Both are enforced
/// by the mutators below; fields stay public for read access in views/tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    pub id: ShiftId,
    #[serde(alias = "role_required")]
    pub required_role: Certification,
    #[serde(default)]
    pub status: ShiftStatus,
    #[serde(default)]
    pub fanout_started: bool,
    #[serde(default)]
    pub assigned_worker_id: Option<WorkerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
}

impl Shift {
    pub fn open(id: impl Into<String>, required_role: Certification) -> Self {
        Self {
            id: ShiftId::new(id),
            required_role,
            status: ShiftStatus::Open,
            fanout_started: false,
            assigned_worker_id: None,
            organization_id: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == ShiftStatus::Open
    }

    /// Returns `true` when this call performed the false→true flip.
    pub fn mark_fanout_started(&mut self) -> bool {
        if self.fanout_started {
            return false;
        }
        self.fanout_started = true;
        true
    }

    pub fn fill(&mut self, worker: &WorkerId) {
        self.status = ShiftStatus::Filled;
        self.assigned_worker_id = Some(worker.clone());
    }

    pub fn is_consistent(&self) -> bool {
        (self.status == ShiftStatus::Filled) == self.assigned_worker_id.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    pub id: WorkerId,
    pub name: String,
    pub phone: String,
    pub role: Certification,
}

impl Worker {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        phone: impl Into<String>,
        role: Certification,
    ) -> Self {
        Self {
            id: WorkerId::new(id),
            name: name.into(),
            phone: phone.into(),
            role,
        }
    }

    pub fn is_eligible_for(&self, shift: &Shift) -> bool {
        self.role == shift.required_role
    }
}

/// Reply payload delivered by the messaging webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub phone: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_id: Option<ShiftId>,
}
