//! Progress aggregation for language servers.
//!
//! Collects `$/progress` notifications from any number of running language
//! servers and turns them into a per-server busy/idle signal:
//! - Latest percentage per (client, token), aggregated to the least-complete task
//! - Rate-limited change notifications (leading call plus one trailing call)
//! - Icon ramp formatting for status lines
//! - Ordered subscriber bus with explicit attach/detach handles
//! - Diagnostic severity counts for the same status line

pub mod bus;
pub mod client;
pub mod config;
pub mod diagnostics;
pub mod event;
pub mod format;
pub mod limiter;
pub mod store;
pub mod tracker;

pub use bus::{ProgressBus, ProgressSubscriber, Subscription, TraceSink};
pub use client::{ClientId, ClientInfo};
pub use config::{StatusConfig, DEFAULT_UPDATE_INTERVAL_MS};
pub use diagnostics::{DiagnosticCounts, DiagnosticSeverity, DiagnosticTheme, DiagnosticsStore};
pub use event::ProgressEvent;
pub use format::{format_clients, icon, Theme};
pub use limiter::{RateLimiter, UpdateCallback};
pub use store::{ProgressStore, RetentionPolicy};
pub use tracker::{ProgressReader, ProgressTracker};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProgressError {
    #[error("Invalid progress notification: {0}")]
    InvalidNotification(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ProgressError>;
