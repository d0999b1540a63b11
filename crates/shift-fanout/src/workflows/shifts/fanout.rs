use serde::Serialize;
use tracing::{info, warn};

use super::domain::{ShiftId, ShiftStatus};
use super::notifier::{fanout_message, Notifier};
use super::repository::ShiftRepository;
use super::service::{ShiftFanoutService, ShiftServiceError};

/// Result of a fanout request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FanoutOutcome {
    Success {
        shift_id: ShiftId,
        notified: usize,
        candidates: usize,
    },
    NotFound {
        shift_id: ShiftId,
    },
    AlreadyNotOpen {
        shift_id: ShiftId,
        status: ShiftStatus,
    },
    AlreadyStarted {
        shift_id: ShiftId,
    },
    NoCandidates {
        shift_id: ShiftId,
    },
}

impl FanoutOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            FanoutOutcome::Success { .. } => "SUCCESS",
            FanoutOutcome::NotFound { .. } => "NOT_FOUND",
            FanoutOutcome::AlreadyNotOpen { .. } => "ALREADY_NOT_OPEN",
            FanoutOutcome::AlreadyStarted { .. } => "ALREADY_STARTED",
            FanoutOutcome::NoCandidates { .. } => "NO_CANDIDATES",
        }
    }
}

impl<R, N> ShiftFanoutService<R, N>
where
    R: ShiftRepository + 'static,
    N: Notifier + 'static,
{
    /// Notify every eligible worker about an open shift and arm the phone
    /// escalation.
    ///
    /// The started flag is flipped under the shift lock, so concurrent
    /// triggers for the same shift produce exactly one fanout. A shift with
    /// no eligible workers keeps the flag set and is not retried.
    pub async fn start_fanout(
        &self,
        shift_id: &ShiftId,
    ) -> Result<FanoutOutcome, ShiftServiceError> {
        let outcome = self.run_fanout(shift_id).await?;
        info!(shift_id = %shift_id, outcome = outcome.label(), "fanout processed");

        if matches!(outcome, FanoutOutcome::Success { .. }) {
            self.schedule_escalation(shift_id.clone());
        }
        Ok(outcome)
    }

    async fn run_fanout(&self, shift_id: &ShiftId) -> Result<FanoutOutcome, ShiftServiceError> {
        let shift_id = shift_id.clone();

        match self.repository.fetch_shift(&shift_id)? {
            None => return Ok(FanoutOutcome::NotFound { shift_id }),
            Some(shift) if !shift.is_open() => {
                return Ok(FanoutOutcome::AlreadyNotOpen {
                    shift_id,
                    status: shift.status,
                })
            }
            Some(_) => {}
        }

        let _guard = self.locks.acquire(&shift_id).await;

        let Some(mut shift) = self.repository.fetch_shift(&shift_id)? else {
            return Ok(FanoutOutcome::NotFound { shift_id });
        };
        if shift.fanout_started {
            return Ok(FanoutOutcome::AlreadyStarted { shift_id });
        }
        if !shift.is_open() {
            return Ok(FanoutOutcome::AlreadyNotOpen {
                shift_id,
                status: shift.status,
            });
        }
        let flipped = shift.mark_fanout_started();
        debug_assert!(flipped, "fanout flag re-checked under the shift lock");

        let role = shift.required_role;
        self.repository.save_shift(shift)?;

        let candidates = self.repository.workers_with_role(role)?;
        if candidates.is_empty() {
            return Ok(FanoutOutcome::NoCandidates { shift_id });
        }

        let message = fanout_message(role);
        let mut notified = 0;
        for candidate in &candidates {
            match self.notifier.send_message(&candidate.phone, &message).await {
                Ok(()) => notified += 1,
                Err(err) => warn!(
                    shift_id = %shift_id,
                    worker_id = %candidate.id,
                    error = %err,
                    "fanout notification failed"
                ),
            }
        }

        Ok(FanoutOutcome::Success {
            shift_id,
            notified,
            candidates: candidates.len(),
        })
    }
}
