//! Shift-claim engine: per-shift locking, notification fanout, delayed phone
//! escalation, and race-free claim resolution for inbound replies.

pub mod claims;
pub mod domain;
pub(crate) mod escalation;
pub mod fanout;
pub mod intent;
pub mod locks;
pub mod notifier;
pub mod repository;
pub mod router;
pub mod scheduler;
pub mod seed;
pub mod service;

#[cfg(test)]
mod tests;

pub use claims::ReplyOutcome;
pub use domain::{
    Certification, InboundMessage, Shift, ShiftId, ShiftStatus, Worker, WorkerId,
};
pub use escalation::EscalationOutcome;
pub use fanout::FanoutOutcome;
pub use intent::{IntentClassifier, KeywordIntentClassifier, ReplyIntent};
pub use locks::{ShiftGuard, ShiftLockRegistry};
pub use notifier::{LoggingNotifier, Notifier, NotifyError};
pub use repository::{InMemoryShiftStore, RepositoryError, ShiftRepository};
pub use router::shift_router;
pub use scheduler::{DeferredScheduler, DeferredTask, TokioScheduler};
pub use seed::{SeedData, SeedError};
pub use service::{ShiftFanoutService, ShiftServiceError};
