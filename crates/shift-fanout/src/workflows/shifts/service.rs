use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use super::domain::{Shift, ShiftId};
use super::escalation::{EscalationOutcome, Escalator};
use super::intent::IntentClassifier;
use super::locks::ShiftLockRegistry;
use super::notifier::Notifier;
use super::repository::{RepositoryError, ShiftRepository};
use super::scheduler::DeferredScheduler;
use crate::config::FanoutConfig;

/// Service composing the shift store, per-shift locks, outbound channel,
/// intent classifier and escalation scheduler.
///
/// Every collaborator is injected, so independent instances never share
/// locks or state.
pub struct ShiftFanoutService<R, N> {
    pub(super) repository: Arc<R>,
    pub(super) notifier: Arc<N>,
    pub(super) locks: Arc<ShiftLockRegistry>,
    pub(super) classifier: Arc<dyn IntentClassifier>,
    scheduler: Arc<dyn DeferredScheduler>,
    escalator: Escalator<R, N>,
    escalation_delay: Duration,
}

impl<R, N> ShiftFanoutService<R, N>
where
    R: ShiftRepository + 'static,
    N: Notifier + 'static,
{
    pub fn new(
        repository: Arc<R>,
        notifier: Arc<N>,
        classifier: Arc<dyn IntentClassifier>,
        scheduler: Arc<dyn DeferredScheduler>,
        config: &FanoutConfig,
    ) -> Self {
        let locks = Arc::new(ShiftLockRegistry::new());
        let escalator = Escalator::new(repository.clone(), notifier.clone(), locks.clone());

        Self {
            repository,
            notifier,
            locks,
            classifier,
            scheduler,
            escalator,
            escalation_delay: config.escalation_delay,
        }
    }

    pub fn locks(&self) -> &ShiftLockRegistry {
        &self.locks
    }

    pub fn escalation_delay(&self) -> Duration {
        self.escalation_delay
    }

    /// Run the escalation check immediately instead of waiting for the timer.
    pub async fn escalate(
        &self,
        shift_id: &ShiftId,
    ) -> Result<EscalationOutcome, ShiftServiceError> {
        self.escalator.escalate(shift_id).await
    }

    /// Fetch a shift for API responses.
    pub fn shift(&self, shift_id: &ShiftId) -> Result<Shift, ShiftServiceError> {
        let shift = self
            .repository
            .fetch_shift(shift_id)?
            .ok_or_else(|| RepositoryError::NotFound(format!("shift {shift_id}")))?;
        Ok(shift)
    }

    pub(super) fn schedule_escalation(&self, shift_id: ShiftId) {
        let escalator = self.escalator.clone();
        info!(
            shift_id = %shift_id,
            delay_secs = self.escalation_delay.as_secs(),
            "escalation scheduled"
        );
        self.scheduler.schedule(
            self.escalation_delay,
            Box::pin(async move {
                if let Err(err) = escalator.escalate(&shift_id).await {
                    error!(shift_id = %shift_id, error = %err, "escalation failed");
                }
            }),
        );
    }
}

/// Error raised by the shift service. Business outcomes such as "not found"
/// or "already filled" are reported through the outcome enums instead.
#[derive(Debug, thiserror::Error)]
pub enum ShiftServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
