use crate::infra::SAMPLE_SEED;
use async_trait::async_trait;
use clap::Args;
use shift_fanout::config::FanoutConfig;
use shift_fanout::error::AppError;
use shift_fanout::workflows::shifts::{
    DeferredScheduler, DeferredTask, InMemoryShiftStore, KeywordIntentClassifier, Notifier,
    NotifyError, SeedData, ShiftFanoutService, ShiftId,
};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Seed file with shifts and workers. Defaults to the bundled sample.
    #[arg(long)]
    pub(crate) seed: Option<PathBuf>,
    /// Shift to fan out. Defaults to the first shift in the seed.
    #[arg(long)]
    pub(crate) shift_id: Option<String>,
    /// Phone number replying to the fanout. Defaults to the first notified worker.
    #[arg(long)]
    pub(crate) reply_from: Option<String>,
    /// Reply text run through the intent classifier.
    #[arg(long, default_value = "Yes, I'll take it")]
    pub(crate) message: String,
}

/// Prints outbound traffic instead of delivering it.
#[derive(Debug, Default)]
struct ConsoleNotifier {
    first_recipient: std::sync::Mutex<Option<String>>,
}

impl ConsoleNotifier {
    fn first_recipient(&self) -> Option<String> {
        self.first_recipient
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn send_message(&self, phone: &str, message: &str) -> Result<(), NotifyError> {
        self.first_recipient
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get_or_insert_with(|| phone.to_string());
        println!("  sms  -> {phone}: {message}");
        Ok(())
    }

    async fn place_call(&self, phone: &str, message: &str) -> Result<(), NotifyError> {
        println!("  call -> {phone}: {message}");
        Ok(())
    }
}

/// Holds deferred work until the demo fires it, so the escalation armed by
/// fanout runs exactly once and without waiting out the real delay.
#[derive(Default)]
struct HeldScheduler {
    tasks: Mutex<Vec<DeferredTask>>,
}

impl HeldScheduler {
    fn take(&self) -> Vec<DeferredTask> {
        let mut tasks = self
            .tasks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::take(&mut *tasks)
    }

    /// Runs every held task once and returns how many ran.
    async fn fire_all(&self) -> usize {
        let tasks = self.take();
        let fired = tasks.len();
        for task in tasks {
            task.await;
        }
        fired
    }
}

impl DeferredScheduler for HeldScheduler {
    fn schedule(&self, _delay: Duration, task: DeferredTask) {
        self.tasks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(task);
    }
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        seed,
        shift_id,
        reply_from,
        message,
    } = args;

    let seed = match seed {
        Some(path) => SeedData::from_path(path)?,
        None => SeedData::from_reader(SAMPLE_SEED.as_bytes())?,
    };
    let store: InMemoryShiftStore = seed.into_store()?;

    let shift_id = match shift_id {
        Some(id) => ShiftId::new(id),
        None => match store.shifts()?.first() {
            Some(shift) => shift.id.clone(),
            None => {
                println!("Seed contains no shifts; nothing to demo.");
                return Ok(());
            }
        },
    };

    let notifier = Arc::new(ConsoleNotifier::default());
    let scheduler = Arc::new(HeldScheduler::default());
    let config = FanoutConfig::default();
    let service = ShiftFanoutService::new(
        Arc::new(store),
        notifier.clone(),
        Arc::new(KeywordIntentClassifier),
        scheduler.clone(),
        &config,
    );

    println!("Shift fanout demo");
    println!("\nFanout for {shift_id}");
    let fanout = service.start_fanout(&shift_id).await?;
    println!("  outcome: {}", fanout.label());

    match reply_from.or_else(|| notifier.first_recipient()) {
        Some(phone) => {
            println!("\nReply from {phone}: {message:?}");
            let reply = service
                .process_reply(&phone, &message, Some(&shift_id))
                .await?;
            println!("  outcome: {}", reply.label());
        }
        None => println!("\nNo worker was notified, skipping the reply step."),
    }

    println!(
        "\nEscalation check (normally runs {}s after fanout)",
        service.escalation_delay().as_secs()
    );
    let fired = scheduler.fire_all().await;
    println!("  ran {fired} scheduled escalation(s)");

    let shift = service.shift(&shift_id)?;
    println!(
        "\nFinal state: {} {} assigned to {}",
        shift.id,
        shift.status.label(),
        shift
            .assigned_worker_id
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "nobody".to_string())
    );

    Ok(())
}
