//! Latest known progress per (client, token).

use crate::ClientId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::trace;

/// What happens to a token's entry once it reports completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionPolicy {
    /// Keep the entry with an absent percentage. It is skipped by aggregation
    /// but stays in memory until the token reports again.
    #[default]
    Retain,
    /// Remove the entry as soon as its percentage becomes absent.
    EvictOnComplete,
}

/// Progress entries keyed by client, then by task token.
///
/// An absent percentage means the task finished or never reported one; it
/// is not the same as the entry being gone.
#[derive(Debug, Clone, Default)]
pub struct ProgressStore {
    clients: HashMap<ClientId, HashMap<String, Option<u32>>>,
    retention: RetentionPolicy,
}

impl ProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retention(retention: RetentionPolicy) -> Self {
        Self {
            clients: HashMap::new(),
            retention,
        }
    }

    pub fn retention(&self) -> RetentionPolicy {
        self.retention
    }

    /// Overwrite the entry for (client, token). Percentages are not range-checked.
    pub fn update(&mut self, client: &ClientId, token: &str, percentage: Option<u32>) {
        trace!(%client, token, ?percentage, "progress update");

        if percentage.is_none() && self.retention == RetentionPolicy::EvictOnComplete {
            if let Some(tokens) = self.clients.get_mut(client) {
                tokens.remove(token);
                if tokens.is_empty() {
                    self.clients.remove(client);
                }
            }
            return;
        }

        self.clients
            .entry(client.clone())
            .or_default()
            .insert(token.to_string(), percentage);
    }

    /// Lowest present percentage for the client, i.e. its least-complete task.
    ///
    /// `None` when the client is unknown or none of its entries has a percentage.
    pub fn min_percentage(&self, client: &ClientId) -> Option<u32> {
        self.clients
            .get(client)?
            .values()
            .filter_map(|p| *p)
            .min()
    }

    /// Whether the client has at least one task with a percentage.
    pub fn is_busy(&self, client: &ClientId) -> bool {
        self.min_percentage(client).is_some()
    }

    /// Clients with at least one stored entry.
    pub fn clients(&self) -> impl Iterator<Item = &ClientId> {
        self.clients.keys()
    }

    /// Total number of stored (client, token) entries, completed ones included.
    pub fn entry_count(&self) -> usize {
        self.clients.values().map(|tokens| tokens.len()).sum()
    }
}
