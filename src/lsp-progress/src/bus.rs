//! Ordered fan-out of progress events to subscribers.
//!
//! Subscribers run in registration order, each seeing the same event. A
//! [`Subscription`] is the only way to remove a subscriber: detaching
//! consumes it, and dropping it detaches as well.

use crate::{ClientId, ProgressEvent, Result};
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::debug;

/// Receives every progress event published on a bus.
pub trait ProgressSubscriber: Send + Sync {
    fn on_progress(&self, event: &ProgressEvent);
}

#[derive(Default)]
struct BusInner {
    subscribers: RwLock<Vec<(u64, Arc<dyn ProgressSubscriber>)>>,
    next_id: AtomicU64,
}

/// Event bus shared by the transport side and the subscribers.
#[derive(Clone, Default)]
pub struct ProgressBus {
    inner: Arc<BusInner>,
}

impl ProgressBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber after all existing ones.
    pub fn subscribe(&self, subscriber: Arc<dyn ProgressSubscriber>) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.subscribers.write().push((id, subscriber));
        Subscription {
            bus: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// Deliver an event to every subscriber, in registration order.
    pub fn publish(&self, event: &ProgressEvent) {
        // Snapshot so subscribers may detach while being called.
        let subscribers: Vec<Arc<dyn ProgressSubscriber>> = self
            .inner
            .subscribers
            .read()
            .iter()
            .map(|(_, subscriber)| Arc::clone(subscriber))
            .collect();

        for subscriber in subscribers {
            subscriber.on_progress(event);
        }
    }

    /// Decode a raw JSON-RPC message and publish it if it is `$/progress`.
    ///
    /// Returns whether an event was published.
    pub fn publish_notification(&self, client: ClientId, message: &Value) -> Result<bool> {
        match ProgressEvent::from_notification(client, message)? {
            Some(event) => {
                self.publish(&event);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.read().len()
    }
}

/// Handle of one registered subscriber.
#[must_use = "dropping a Subscription detaches its subscriber"]
pub struct Subscription {
    bus: Weak<BusInner>,
    id: u64,
}

impl Subscription {
    /// Remove the subscriber from its bus.
    pub fn detach(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.subscribers.write().retain(|(id, _)| *id != self.id);
            debug!(subscription = self.id, "Progress subscriber detached");
        }
    }
}

/// Debug log sink: traces every event it receives.
#[derive(Debug, Default)]
pub struct TraceSink;

impl ProgressSubscriber for TraceSink {
    fn on_progress(&self, event: &ProgressEvent) {
        debug!(
            client = %event.client,
            token = %event.token,
            percentage = ?event.percentage,
            "$/progress"
        );
    }
}
