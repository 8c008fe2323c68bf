//! Trailing-edge debouncer for search-as-you-type filtering.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Delay used for catalog filtering while typing.
pub const FILTER_DEBOUNCE: Duration = Duration::from_millis(300);

/// Runs only the last of a burst of scheduled jobs.
///
/// Scheduling cancels the *pending timer* of the previous job. Once a timer
/// has fired its job runs in its own task and is never cancelled, so a stale
/// job may still complete after a newer one was scheduled.
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<CancellationToken>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Schedules `work` to run after the delay unless superseded first.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let previous = self
            .pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .replace(token.clone());
        if let Some(previous) = previous {
            previous.cancel();
        }

        let delay = self.delay;
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::trace!("[Debounce] Pending job superseded");
                }
                _ = tokio::time::sleep(delay) => {
                    tokio::spawn(work);
                }
            }
        });
    }

    /// Cancels the pending timer, if any.
    pub fn cancel_pending(&self) {
        if let Some(token) = self
            .pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
        {
            token.cancel();
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(FILTER_DEBOUNCE)
    }
}
