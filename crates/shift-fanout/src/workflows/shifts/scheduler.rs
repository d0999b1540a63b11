use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::debug;

/// Unit of deferred work, already bound to its argument (e.g. a shift id).
pub type DeferredTask = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Runs `task` no earlier than `delay` from now, at most once. Tasks are not
/// cancellable; work that may become stale must re-check its own state.
pub trait DeferredScheduler: Send + Sync {
    fn schedule(&self, delay: Duration, task: DeferredTask);
}

/// Scheduler backed by a tokio runtime: one sleeping task per submission.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Binds to the runtime of the calling task.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }
}

impl DeferredScheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: DeferredTask) {
        debug!(delay_secs = delay.as_secs_f64(), "deferred task scheduled");
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });
    }
}
