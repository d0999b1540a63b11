use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::config::FanoutConfig;
use crate::workflows::shifts::domain::{Certification, Shift, ShiftId, Worker};
use crate::workflows::shifts::intent::KeywordIntentClassifier;
use crate::workflows::shifts::notifier::{Notifier, NotifyError};
use crate::workflows::shifts::repository::{InMemoryShiftStore, ShiftRepository};
use crate::workflows::shifts::scheduler::{DeferredScheduler, DeferredTask};
use crate::workflows::shifts::service::ShiftFanoutService;

pub(super) type TestService = ShiftFanoutService<InMemoryShiftStore, RecordingNotifier>;

pub(super) struct Harness {
    pub(super) service: Arc<TestService>,
    pub(super) store: Arc<InMemoryShiftStore>,
    pub(super) notifier: Arc<RecordingNotifier>,
    pub(super) scheduler: Arc<ManualScheduler>,
}

impl Harness {
    pub(super) fn shift(&self, id: &str) -> Shift {
        self.store
            .fetch_shift(&ShiftId::new(id))
            .expect("fetch shift")
            .expect("shift present")
    }

    pub(super) fn assert_store_consistent(&self) {
        for shift in self.store.shifts().expect("list shifts") {
            assert!(shift.is_consistent(), "inconsistent shift {shift:?}");
        }
    }
}

/// S1 (RN, open) with W1 (RN, 555-1) and W2 (CNA, 555-2).
pub(super) fn scenario_store() -> InMemoryShiftStore {
    let store = InMemoryShiftStore::new();
    store
        .insert_shift(Shift::open("S1", Certification::RegisteredNurse))
        .expect("insert S1");
    store
        .insert_worker(Worker::new(
            "W1",
            "Ada Lovelace",
            "555-1",
            Certification::RegisteredNurse,
        ))
        .expect("insert W1");
    store
        .insert_worker(Worker::new(
            "W2",
            "Grace Hopper",
            "555-2",
            Certification::CertifiedNursingAssistant,
        ))
        .expect("insert W2");
    store
}

pub(super) fn harness_with(store: InMemoryShiftStore, notifier: RecordingNotifier) -> Harness {
    let store = Arc::new(store);
    let notifier = Arc::new(notifier);
    let scheduler = Arc::new(ManualScheduler::default());
    let service = Arc::new(ShiftFanoutService::new(
        store.clone(),
        notifier.clone(),
        Arc::new(KeywordIntentClassifier),
        scheduler.clone(),
        &FanoutConfig::default(),
    ));

    Harness {
        service,
        store,
        notifier,
        scheduler,
    }
}

pub(super) fn harness() -> Harness {
    harness_with(scenario_store(), RecordingNotifier::default())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Delivery {
    pub(super) phone: String,
    pub(super) message: String,
}

/// Notifier that records every delivery and can be told to fail for
/// specific numbers or to take a while.
#[derive(Default)]
pub(super) struct RecordingNotifier {
    messages: Mutex<Vec<Delivery>>,
    calls: Mutex<Vec<Delivery>>,
    failing: HashSet<String>,
    latency: Duration,
}

impl RecordingNotifier {
    pub(super) fn failing_for(phones: &[&str]) -> Self {
        Self {
            failing: phones.iter().map(|phone| phone.to_string()).collect(),
            ..Self::default()
        }
    }

    pub(super) fn slow(latency: Duration) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    pub(super) fn messages(&self) -> Vec<Delivery> {
        self.messages.lock().expect("messages mutex poisoned").clone()
    }

    pub(super) fn calls(&self) -> Vec<Delivery> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    async fn record(&self, log: &Mutex<Vec<Delivery>>, phone: &str, message: &str) -> Result<(), NotifyError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.failing.contains(phone) {
            return Err(NotifyError::Rejected(phone.to_string()));
        }
        log.lock().expect("delivery mutex poisoned").push(Delivery {
            phone: phone.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_message(&self, phone: &str, message: &str) -> Result<(), NotifyError> {
        self.record(&self.messages, phone, message).await
    }

    async fn place_call(&self, phone: &str, message: &str) -> Result<(), NotifyError> {
        self.record(&self.calls, phone, message).await
    }
}

/// Scheduler that captures deferred tasks until the test fires them.
#[derive(Default)]
pub(super) struct ManualScheduler {
    tasks: Mutex<Vec<(Duration, DeferredTask)>>,
}

impl ManualScheduler {
    pub(super) fn pending(&self) -> usize {
        self.tasks.lock().expect("scheduler mutex poisoned").len()
    }

    pub(super) fn delays(&self) -> Vec<Duration> {
        self.tasks
            .lock()
            .expect("scheduler mutex poisoned")
            .iter()
            .map(|(delay, _)| *delay)
            .collect()
    }

    pub(super) async fn fire_all(&self) {
        let tasks: Vec<_> = self
            .tasks
            .lock()
            .expect("scheduler mutex poisoned")
            .drain(..)
            .collect();
        for (_, task) in tasks {
            task.await;
        }
    }
}

impl DeferredScheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: DeferredTask) {
        self.tasks
            .lock()
            .expect("scheduler mutex poisoned")
            .push((delay, task));
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
