//! Entry point tying the store, the rate limiter and the formatter together.

use crate::{
    format_clients, ClientId, ClientInfo, ProgressBus, ProgressEvent, ProgressStore,
    ProgressSubscriber, RateLimiter, StatusConfig, Subscription, Theme, UpdateCallback,
};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

struct UpdateSettings {
    on_update: Option<UpdateCallback>,
    interval: Duration,
}

struct TrackerInner {
    store: Arc<RwLock<ProgressStore>>,
    limiter: RateLimiter,
    settings: Arc<RwLock<UpdateSettings>>,
}

/// Aggregates progress events and pushes rate-limited update notifications.
///
/// Cloning is cheap; all clones share the same state.
#[derive(Clone)]
pub struct ProgressTracker {
    inner: Arc<TrackerInner>,
}

impl ProgressTracker {
    /// Create a tracker that is not attached to any bus.
    ///
    /// Events are fed with [`ProgressTracker::on_progress_event`].
    pub fn new(config: &StatusConfig) -> Self {
        Self {
            inner: Arc::new(TrackerInner {
                store: Arc::new(RwLock::new(ProgressStore::with_retention(config.retention))),
                limiter: RateLimiter::new(),
                settings: Arc::new(RwLock::new(UpdateSettings {
                    on_update: None,
                    interval: config.interval(),
                })),
            }),
        }
    }

    /// Create a tracker already subscribed to `bus`.
    ///
    /// The subscription is created together with the tracker, so the same
    /// tracker can never be registered twice.
    pub fn attach(bus: &ProgressBus, config: &StatusConfig) -> (Self, Subscription) {
        let tracker = Self::new(config);
        let subscription = bus.subscribe(Arc::new(TrackerSubscriber(tracker.clone())));
        (tracker, subscription)
    }

    /// Set the update callback and interval, replacing previous values.
    ///
    /// With no callback, progress is still aggregated but nothing is pushed.
    pub fn configure(&self, on_update: Option<UpdateCallback>, interval: Duration) {
        let mut settings = self.inner.settings.write();
        settings.on_update = on_update;
        settings.interval = interval;
    }

    /// Record one progress event, then request an update notification.
    pub fn on_progress_event(&self, event: &ProgressEvent) {
        self.inner
            .store
            .write()
            .update(&event.client, &event.token, event.percentage);

        let interval = {
            let settings = self.inner.settings.read();
            if settings.on_update.is_none() {
                return;
            }
            settings.interval
        };

        // Resolve the callback when the call actually happens, not now.
        let settings = Arc::clone(&self.inner.settings);
        let fire: UpdateCallback = Arc::new(move || {
            let on_update = settings.read().on_update.clone();
            if let Some(on_update) = on_update {
                on_update();
            }
        });
        self.inner.limiter.notify(fire, interval);
    }

    /// Read handle that does not keep the tracker's callback alive.
    pub fn reader(&self) -> ProgressReader {
        ProgressReader {
            store: Arc::clone(&self.inner.store),
        }
    }

    pub fn min_percentage(&self, client: &ClientId) -> Option<u32> {
        self.inner.store.read().min_percentage(client)
    }

    pub fn format(&self, clients: &[ClientInfo], theme: &Theme) -> String {
        format_clients(&self.inner.store.read(), clients, theme)
    }

    /// Whether a deferred update notification is scheduled.
    pub fn has_pending_update(&self) -> bool {
        self.inner.limiter.has_pending()
    }

    /// Drop a scheduled update notification. Returns whether one was scheduled.
    pub fn cancel_pending_update(&self) -> bool {
        self.inner.limiter.cancel_pending()
    }
}

/// Bus adapter. Private so only [`ProgressTracker::attach`] can subscribe a tracker.
struct TrackerSubscriber(ProgressTracker);

impl ProgressSubscriber for TrackerSubscriber {
    fn on_progress(&self, event: &ProgressEvent) {
        self.0.on_progress_event(event);
    }
}

/// Shared read access to the progress store.
///
/// Hand this to update callbacks instead of the tracker itself.
#[derive(Clone)]
pub struct ProgressReader {
    store: Arc<RwLock<ProgressStore>>,
}

impl ProgressReader {
    pub fn min_percentage(&self, client: &ClientId) -> Option<u32> {
        self.store.read().min_percentage(client)
    }

    pub fn is_busy(&self, client: &ClientId) -> bool {
        self.store.read().is_busy(client)
    }

    pub fn format(&self, clients: &[ClientInfo], theme: &Theme) -> String {
        format_clients(&self.store.read(), clients, theme)
    }

    pub fn entry_count(&self) -> usize {
        self.store.read().entry_count()
    }
}
