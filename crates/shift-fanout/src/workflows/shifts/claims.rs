use serde::Serialize;
use tracing::{info, warn};

use super::domain::{ShiftId, Worker, WorkerId};
use super::intent::ReplyIntent;
use super::notifier::{Notifier, SHIFT_ALREADY_FILLED, SHIFT_CONFIRMED};
use super::repository::ShiftRepository;
use super::service::{ShiftFanoutService, ShiftServiceError};

/// Result of processing an inbound reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReplyOutcome {
    Claimed {
        shift_id: ShiftId,
        worker_id: WorkerId,
    },
    UnknownSender {
        phone: String,
    },
    UnclearIntent {
        intent: ReplyIntent,
    },
    NoShiftsAvailable {
        worker_id: WorkerId,
    },
}

impl ReplyOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            ReplyOutcome::Claimed { .. } => "CLAIMED",
            ReplyOutcome::UnknownSender { .. } => "UNKNOWN_SENDER",
            ReplyOutcome::UnclearIntent { .. } => "UNCLEAR_INTENT",
            ReplyOutcome::NoShiftsAvailable { .. } => "NO_SHIFTS_AVAILABLE",
        }
    }
}

impl<R, N> ShiftFanoutService<R, N>
where
    R: ShiftRepository + 'static,
    N: Notifier + 'static,
{
    /// Resolve a worker's reply, awarding at most one open shift.
    ///
    /// The target shift wins when it is open and matches the worker's role;
    /// otherwise the earliest-loaded open shift for that role is claimed. Each
    /// candidate is re-read and mutated under its own lock, and no path holds
    /// two shift locks at once.
    pub async fn process_reply(
        &self,
        phone: &str,
        message: &str,
        target: Option<&ShiftId>,
    ) -> Result<ReplyOutcome, ShiftServiceError> {
        let outcome = self.resolve_reply(phone, message, target).await?;
        info!(
            %phone,
            target = target.map(ShiftId::as_str),
            outcome = outcome.label(),
            "reply processed"
        );
        Ok(outcome)
    }

    async fn resolve_reply(
        &self,
        phone: &str,
        message: &str,
        target: Option<&ShiftId>,
    ) -> Result<ReplyOutcome, ShiftServiceError> {
        let Some(worker) = self.repository.worker_by_contact(phone)? else {
            return Ok(ReplyOutcome::UnknownSender {
                phone: phone.to_string(),
            });
        };

        let intent = self.classifier.classify(message).await;
        if intent != ReplyIntent::Accept {
            return Ok(ReplyOutcome::UnclearIntent { intent });
        }

        if let Some(target) = target {
            // Unknown ids never reach the lock registry.
            if self.repository.fetch_shift(target)?.is_some() {
                let _guard = self.locks.acquire(target).await;
                if self.try_fill(&worker, target).await? {
                    return Ok(self.claimed(target, &worker));
                }
            }
        }

        for candidate in self.repository.open_shifts_for_role(worker.role)? {
            if Some(&candidate.id) == target {
                continue;
            }
            let _guard = self.locks.acquire(&candidate.id).await;
            if self.try_fill(&worker, &candidate.id).await? {
                return Ok(self.claimed(&candidate.id, &worker));
            }
        }

        self.notify(&worker, SHIFT_ALREADY_FILLED).await;
        Ok(ReplyOutcome::NoShiftsAvailable {
            worker_id: worker.id,
        })
    }

    /// Caller must hold `shift_id`'s lock.
    async fn try_fill(&self, worker: &Worker, shift_id: &ShiftId) -> Result<bool, ShiftServiceError> {
        let Some(mut shift) = self.repository.fetch_shift(shift_id)? else {
            return Ok(false);
        };
        if !shift.is_open() || !worker.is_eligible_for(&shift) {
            return Ok(false);
        }

        shift.fill(&worker.id);
        self.repository.save_shift(shift)?;
        self.notify(worker, SHIFT_CONFIRMED).await;
        Ok(true)
    }

    fn claimed(&self, shift_id: &ShiftId, worker: &Worker) -> ReplyOutcome {
        ReplyOutcome::Claimed {
            shift_id: shift_id.clone(),
            worker_id: worker.id.clone(),
        }
    }

    async fn notify(&self, worker: &Worker, message: &str) {
        if let Err(err) = self.notifier.send_message(&worker.phone, message).await {
            warn!(worker_id = %worker.id, error = %err, "reply acknowledgement failed");
        }
    }
}
