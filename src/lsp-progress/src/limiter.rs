//! Leading-edge rate limiter with a single trailing call.
//!
//! A call is made immediately when the window since the previous call has
//! elapsed. Inside the window, the first request schedules one deferred call
//! for the moment the window closes and every further request is coalesced
//! into it.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

/// Callback invoked when aggregated progress changed.
///
/// It takes no snapshot: it should read whatever state it needs when it runs.
pub type UpdateCallback = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Default)]
struct LimiterState {
    /// When the callback last ran.
    last_fire: Option<Instant>,
    /// The deferred call, if one is scheduled. At most one at a time.
    pending: Option<JoinHandle<()>>,
}

/// Rate limiter shared between the notifying side and its deferred task.
#[derive(Debug, Clone, Default)]
pub struct RateLimiter {
    state: Arc<Mutex<LimiterState>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a call to `callback`, at most once per `interval`.
    ///
    /// Deferred calls run on the current Tokio runtime. Without one, the
    /// deferral is dropped and logged; the next request tries again.
    pub fn notify(&self, callback: UpdateCallback, interval: Duration) {
        let now = Instant::now();
        let mut state = self.state.lock();

        let elapsed = state
            .last_fire
            .map(|last| now.saturating_duration_since(last));

        match elapsed {
            Some(elapsed) if elapsed < interval => {
                if state.pending.is_some() {
                    trace!("update coalesced into pending call");
                    return;
                }

                let Ok(runtime) = Handle::try_current() else {
                    warn!("No Tokio runtime available, dropping deferred progress update");
                    return;
                };

                let delay = interval - elapsed;
                let shared = Arc::clone(&self.state);
                let task = runtime.spawn(async move {
                    tokio::time::sleep(delay).await;
                    {
                        let mut state = shared.lock();
                        state.last_fire = Some(Instant::now());
                        state.pending = None;
                    }
                    callback();
                });
                // Still holding the lock: the task cannot clear `pending`
                // before it has been set.
                state.pending = Some(task);

                debug!(delay_ms = delay.as_millis() as u64, "Deferred progress update");
            }
            _ => {
                state.last_fire = Some(now);
                drop(state);
                callback();
            }
        }
    }

    /// Whether a deferred call is scheduled.
    pub fn has_pending(&self) -> bool {
        self.state.lock().pending.is_some()
    }

    /// When the callback last ran, if ever.
    pub fn last_fire(&self) -> Option<Instant> {
        self.state.lock().last_fire
    }

    /// Abort the scheduled deferred call. Returns whether one was scheduled.
    ///
    /// Meant for host teardown only; normal operation never cancels.
    pub fn cancel_pending(&self) -> bool {
        match self.state.lock().pending.take() {
            Some(task) => {
                task.abort();
                true
            }
            None => false,
        }
    }
}
