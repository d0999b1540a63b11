use metrics_exporter_prometheus::PrometheusHandle;
use shift_fanout::config::FanoutConfig;
use shift_fanout::error::AppError;
use shift_fanout::workflows::shifts::{
    InMemoryShiftStore, KeywordIntentClassifier, LoggingNotifier, SeedData, ShiftFanoutService,
    TokioScheduler,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) type ApiShiftService = ShiftFanoutService<InMemoryShiftStore, LoggingNotifier>;

pub(crate) const SAMPLE_SEED: &str = include_str!("../data/sample_seed.json");

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn load_store(config: &FanoutConfig) -> Result<InMemoryShiftStore, AppError> {
    let seed = match &config.seed_path {
        Some(path) => {
            info!(path = %path.display(), "loading shift seed data");
            SeedData::from_path(path)?
        }
        None => {
            warn!("FANOUT_SEED_PATH not set; starting with an empty shift store");
            SeedData::default()
        }
    };
    Ok(seed.into_store()?)
}

/// Must be called from within the tokio runtime that will run escalations.
pub(crate) fn build_service(
    store: InMemoryShiftStore,
    config: &FanoutConfig,
) -> Arc<ApiShiftService> {
    Arc::new(ShiftFanoutService::new(
        Arc::new(store),
        Arc::new(LoggingNotifier::new(config.notifier_latency)),
        Arc::new(KeywordIntentClassifier),
        Arc::new(TokioScheduler::current()),
        config,
    ))
}
