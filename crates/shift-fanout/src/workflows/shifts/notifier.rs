use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use super::domain::Certification;

pub(crate) const SHIFT_CONFIRMED: &str = "Shift confirmed.";
pub(crate) const SHIFT_ALREADY_FILLED: &str = "Shift already filled.";
pub(crate) const ESCALATION_CALL: &str = "Shift open. Call to claim.";

pub(crate) fn fanout_message(role: Certification) -> String {
    format!("New {role} shift open. Reply Yes or Accept to claim.")
}

/// Outbound SMS/voice channel. Delivery is at-least-once and the engine never
/// retries; a failed send is logged and skipped.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_message(&self, phone: &str, message: &str) -> Result<(), NotifyError>;
    async fn place_call(&self, phone: &str, message: &str) -> Result<(), NotifyError>;
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
    #[error("recipient {0} rejected")]
    Rejected(String),
}

/// Notifier that only records deliveries in the log, optionally after a
/// simulated carrier delay.
#[derive(Debug, Default, Clone)]
pub struct LoggingNotifier {
    latency: Duration,
}

impl LoggingNotifier {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    async fn simulate_latency(&self, factor: u32) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency * factor).await;
        }
    }
}

#[async_trait]
impl Notifier for LoggingNotifier {
    async fn send_message(&self, phone: &str, message: &str) -> Result<(), NotifyError> {
        self.simulate_latency(1).await;
        info!(%phone, %message, "sending sms");
        Ok(())
    }

    async fn place_call(&self, phone: &str, message: &str) -> Result<(), NotifyError> {
        self.simulate_latency(2).await;
        info!(%phone, %message, "placing call");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fanout_message_names_the_role() {
        assert_eq!(
            fanout_message(Certification::RegisteredNurse),
            "New RN shift open. Reply Yes or Accept to claim."
        );
    }

    #[tokio::test(start_paused = true)]
    async fn logging_notifier_waits_out_latency() {
        let notifier = LoggingNotifier::new(Duration::from_secs(1));
        let started = tokio::time::Instant::now();
        notifier
            .place_call("555-1", ESCALATION_CALL)
            .await
            .expect("logging never fails");
        assert!(started.elapsed() >= Duration::from_secs(2));
    }
}
