use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::AbortHandle;
use tokio::time::sleep;
use tracing::debug;

/// Cancellable scheduled-task handle.
///
/// Holds at most one pending task. Scheduling again aborts the pending one, so
/// only the last trigger inside a quiet window runs. Once the quiet period has
/// elapsed the work is spawned on its own task and can no longer be aborted.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<AbortHandle>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    fn pending(&self) -> MutexGuard<'_, Option<AbortHandle>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `work` after the quiet period unless superseded first
    pub fn schedule<F>(&self, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            sleep(delay).await;
            tokio::spawn(work);
        });

        if let Some(previous) = self.pending().replace(handle.abort_handle()) {
            previous.abort();
            debug!("Debounced task superseded");
        }
    }

    /// Discard the pending task, if any. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        match self.pending().take() {
            Some(handle) => {
                let was_pending = !handle.is_finished();
                handle.abort();
                was_pending
            }
            None => false,
        }
    }
}
