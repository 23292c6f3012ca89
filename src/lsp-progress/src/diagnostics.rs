//! Diagnostic severity counts for the status line.

use crate::{ClientId, ProgressError, Result};
use lsp_types::notification::{Notification, PublishDiagnostics};
use lsp_types::PublishDiagnosticsParams;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::ops::AddAssign;
use tracing::trace;

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Information,
    Hint,
}

impl From<lsp_types::DiagnosticSeverity> for DiagnosticSeverity {
    fn from(severity: lsp_types::DiagnosticSeverity) -> Self {
        match severity {
            lsp_types::DiagnosticSeverity::ERROR => DiagnosticSeverity::Error,
            lsp_types::DiagnosticSeverity::WARNING => DiagnosticSeverity::Warning,
            lsp_types::DiagnosticSeverity::INFORMATION => DiagnosticSeverity::Information,
            lsp_types::DiagnosticSeverity::HINT => DiagnosticSeverity::Hint,
            _ => DiagnosticSeverity::Information,
        }
    }
}

/// Labels used when rendering [`DiagnosticCounts`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticTheme {
    pub error: String,
    pub warning: String,
    pub info: String,
    pub hint: String,
    pub separator: String,
}

impl Default for DiagnosticTheme {
    fn default() -> Self {
        Self {
            error: "E".to_string(),
            warning: "W".to_string(),
            info: "I".to_string(),
            hint: "H".to_string(),
            separator: " ".to_string(),
        }
    }
}

/// Number of diagnostics per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticCounts {
    pub errors: usize,
    pub warnings: usize,
    pub information: usize,
    pub hints: usize,
}

impl DiagnosticCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count LSP diagnostics. A missing severity counts as an error.
    pub fn from_lsp(diagnostics: &[lsp_types::Diagnostic]) -> Self {
        let mut counts = Self::new();
        for diagnostic in diagnostics {
            let severity = diagnostic
                .severity
                .map(DiagnosticSeverity::from)
                .unwrap_or(DiagnosticSeverity::Error);
            counts.add(severity);
        }
        counts
    }

    pub fn add(&mut self, severity: DiagnosticSeverity) {
        match severity {
            DiagnosticSeverity::Error => self.errors += 1,
            DiagnosticSeverity::Warning => self.warnings += 1,
            DiagnosticSeverity::Information => self.information += 1,
            DiagnosticSeverity::Hint => self.hints += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.errors + self.warnings + self.information + self.hints
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Render non-zero counts, e.g. `E2 W1`. Empty when there is nothing.
    pub fn format(&self, theme: &DiagnosticTheme) -> String {
        [
            (&theme.error, self.errors),
            (&theme.warning, self.warnings),
            (&theme.info, self.information),
            (&theme.hint, self.hints),
        ]
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(label, count)| format!("{}{}", label, count))
        .collect::<Vec<_>>()
        .join(theme.separator.as_str())
    }
}

impl AddAssign for DiagnosticCounts {
    fn add_assign(&mut self, other: Self) {
        self.errors += other.errors;
        self.warnings += other.warnings;
        self.information += other.information;
        self.hints += other.hints;
    }
}

/// Latest diagnostic counts per client and document.
///
/// Each `publishDiagnostics` replaces the document's previous counts.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticsStore {
    files: HashMap<ClientId, HashMap<String, DiagnosticCounts>>,
}

impl DiagnosticsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_file_counts(&mut self, client: &ClientId, uri: impl Into<String>, counts: DiagnosticCounts) {
        let files = self.files.entry(client.clone()).or_default();
        let uri = uri.into();
        if counts.is_empty() {
            files.remove(&uri);
        } else {
            files.insert(uri, counts);
        }
    }

    pub fn clear_client(&mut self, client: &ClientId) {
        self.files.remove(client);
    }

    /// Apply a raw JSON-RPC message if it is `textDocument/publishDiagnostics`.
    ///
    /// Returns whether the store changed.
    pub fn apply_notification(&mut self, client: &ClientId, message: &Value) -> Result<bool> {
        let method = message.get("method").and_then(|m| m.as_str());
        if method != Some(PublishDiagnostics::METHOD) {
            return Ok(false);
        }

        let params = message.get("params").ok_or_else(|| {
            ProgressError::InvalidNotification(format!("{} without params", PublishDiagnostics::METHOD))
        })?;
        let params: PublishDiagnosticsParams = serde_json::from_value(params.clone())?;
        let counts = DiagnosticCounts::from_lsp(&params.diagnostics);

        trace!(%client, uri = %params.uri, total = counts.total(), "diagnostics update");
        self.set_file_counts(client, params.uri.to_string(), counts);
        Ok(true)
    }

    /// Counts summed over every document of one client.
    pub fn client_counts(&self, client: &ClientId) -> DiagnosticCounts {
        let mut total = DiagnosticCounts::new();
        if let Some(files) = self.files.get(client) {
            for counts in files.values() {
                total += *counts;
            }
        }
        total
    }

    /// Counts summed over every client.
    pub fn total_counts(&self) -> DiagnosticCounts {
        let mut total = DiagnosticCounts::new();
        for files in self.files.values() {
            for counts in files.values() {
                total += *counts;
            }
        }
        total
    }
}
