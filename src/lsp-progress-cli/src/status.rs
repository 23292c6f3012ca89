//! The status line rendered on stdout.

use lsp_progress::{ClientId, ClientInfo, DiagnosticsStore, ProgressReader, StatusConfig};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::Write;

/// Everything needed to draw one status line.
pub struct StatusLine {
    progress: ProgressReader,
    config: StatusConfig,
    show_diagnostics: bool,
    clients: RwLock<BTreeMap<ClientId, String>>,
    diagnostics: RwLock<DiagnosticsStore>,
}

impl StatusLine {
    pub fn new(progress: ProgressReader, config: StatusConfig, show_diagnostics: bool) -> Self {
        Self {
            progress,
            config,
            show_diagnostics,
            clients: RwLock::new(BTreeMap::new()),
            diagnostics: RwLock::new(DiagnosticsStore::new()),
        }
    }

    /// Remember a client's display name. The latest name wins.
    pub fn register_client(&self, client: ClientInfo) {
        self.clients.write().insert(client.id, client.name);
    }

    /// Feed a raw message to the diagnostic counter. Returns whether counts changed.
    pub fn apply_diagnostics(&self, client: &ClientId, message: &Value) -> lsp_progress::Result<bool> {
        if !self.show_diagnostics {
            return Ok(false);
        }
        self.diagnostics.write().apply_notification(client, message)
    }

    pub fn render(&self) -> String {
        let clients: Vec<ClientInfo> = self
            .clients
            .read()
            .iter()
            .map(|(id, name)| ClientInfo::new(id.clone(), name.clone()))
            .collect();

        let progress = self.progress.format(&clients, &self.config.theme);
        if !self.show_diagnostics {
            return progress;
        }

        let counts = self
            .diagnostics
            .read()
            .total_counts()
            .format(&self.config.diagnostics);
        match (progress.is_empty(), counts.is_empty()) {
            (_, true) => progress,
            (true, false) => counts,
            (false, false) => format!("{} {}", progress, counts),
        }
    }

    /// Write the current line to stdout.
    pub fn print(&self) {
        let line = self.render();
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", line).and_then(|()| stdout.flush()) {
            tracing::debug!(error = %e, "Failed to write status line");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lsp_progress::{ProgressEvent, ProgressTracker, Theme};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn config() -> StatusConfig {
        StatusConfig::default().with_theme(
            Theme::default()
                .with_ramp("01234")
                .with_idle("-")
                .with_show_name(true),
        )
    }

    fn error_in(uri: &str) -> Value {
        json!({
            "jsonrpc": "2.0",
            "method": "textDocument/publishDiagnostics",
            "params": {
                "uri": uri,
                "diagnostics": [{
                    "range": {
                        "start": { "line": 3, "character": 0 },
                        "end": { "line": 3, "character": 4 }
                    },
                    "severity": 1,
                    "message": "mismatched types"
                }]
            }
        })
    }

    #[test]
    fn test_render_progress_only() {
        let tracker = ProgressTracker::new(&config());
        let status = StatusLine::new(tracker.reader(), config(), false);
        status.register_client(ClientInfo::new(2u64, "gopls"));
        status.register_client(ClientInfo::new(1u64, "rust-analyzer"));

        tracker.on_progress_event(&ProgressEvent::new(1u64, "index", Some(100)));

        assert_eq!(status.render(), "- gopls 4 rust-analyzer");
    }

    #[test]
    fn test_render_with_diagnostics() {
        let tracker = ProgressTracker::new(&config());
        let status = StatusLine::new(tracker.reader(), config(), true);
        status.register_client(ClientInfo::new(1u64, "rust-analyzer"));

        assert_eq!(status.render(), "- rust-analyzer");

        let changed = status
            .apply_diagnostics(&ClientId::from(1u64), &error_in("file:///src/main.rs"))
            .unwrap();
        assert!(changed);
        assert_eq!(status.render(), "- rust-analyzer E1");
    }

    #[test]
    fn test_diagnostics_ignored_when_disabled() {
        let tracker = ProgressTracker::new(&config());
        let status = StatusLine::new(tracker.reader(), config(), false);

        let changed = status
            .apply_diagnostics(&ClientId::from(1u64), &error_in("file:///src/main.rs"))
            .unwrap();
        assert!(!changed);
        assert_eq!(status.render(), "");
    }

    #[test]
    fn test_render_diagnostics_without_clients() {
        let tracker = ProgressTracker::new(&config());
        let status = StatusLine::new(tracker.reader(), config(), true);

        status
            .apply_diagnostics(&ClientId::from(1u64), &error_in("file:///a.rs"))
            .unwrap();
        assert_eq!(status.render(), "E1");
    }
}
