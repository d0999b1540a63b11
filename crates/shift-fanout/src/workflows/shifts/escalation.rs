use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::domain::ShiftId;
use super::locks::ShiftLockRegistry;
use super::notifier::{Notifier, ESCALATION_CALL};
use super::repository::ShiftRepository;
use super::service::ShiftServiceError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EscalationOutcome {
    Called {
        shift_id: ShiftId,
        placed: usize,
        candidates: usize,
    },
    SkippedFilled {
        shift_id: ShiftId,
    },
    SkippedMissing {
        shift_id: ShiftId,
    },
}

impl EscalationOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            EscalationOutcome::Called { .. } => "CALLED",
            EscalationOutcome::SkippedFilled { .. } => "SKIPPED_FILLED",
            EscalationOutcome::SkippedMissing { .. } => "SKIPPED_MISSING",
        }
    }
}

/// Phone escalation for shifts still open once the fanout window closes.
///
/// Runs under the same per-shift lock as claims, so it either sees the shift
/// before a claim or after the claim has been persisted, never in between.
pub(crate) struct Escalator<R, N> {
    repository: Arc<R>,
    notifier: Arc<N>,
    locks: Arc<ShiftLockRegistry>,
}

impl<R, N> Clone for Escalator<R, N> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            notifier: self.notifier.clone(),
            locks: self.locks.clone(),
        }
    }
}

impl<R, N> Escalator<R, N>
where
    R: ShiftRepository,
    N: Notifier,
{
    pub(crate) fn new(repository: Arc<R>, notifier: Arc<N>, locks: Arc<ShiftLockRegistry>) -> Self {
        Self {
            repository,
            notifier,
            locks,
        }
    }

    pub(crate) async fn escalate(
        &self,
        shift_id: &ShiftId,
    ) -> Result<EscalationOutcome, ShiftServiceError> {
        let outcome = self.run(shift_id).await?;
        info!(shift_id = %shift_id, outcome = outcome.label(), "escalation processed");
        Ok(outcome)
    }

    async fn run(&self, shift_id: &ShiftId) -> Result<EscalationOutcome, ShiftServiceError> {
        let shift_id = shift_id.clone();
        // Unknown ids never reach the lock registry.
        if self.repository.fetch_shift(&shift_id)?.is_none() {
            return Ok(EscalationOutcome::SkippedMissing { shift_id });
        }
        let _guard = self.locks.acquire(&shift_id).await;

        let shift = match self.repository.fetch_shift(&shift_id)? {
            None => return Ok(EscalationOutcome::SkippedMissing { shift_id }),
            Some(shift) if !shift.is_open() => {
                return Ok(EscalationOutcome::SkippedFilled { shift_id })
            }
            Some(shift) => shift,
        };

        let candidates = self.repository.workers_with_role(shift.required_role)?;
        let mut placed = 0;
        for candidate in &candidates {
            match self
                .notifier
                .place_call(&candidate.phone, ESCALATION_CALL)
                .await
            {
                Ok(()) => placed += 1,
                Err(err) => warn!(
                    shift_id = %shift_id,
                    worker_id = %candidate.id,
                    error = %err,
                    "escalation call failed"
                ),
            }
        }

        Ok(EscalationOutcome::Called {
            shift_id,
            placed,
            candidates: candidates.len(),
        })
    }
}
