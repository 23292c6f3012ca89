//! Status line configuration.

use crate::{DiagnosticTheme, RetentionPolicy, Result, Theme};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default minimum time between two update notifications in milliseconds.
pub const DEFAULT_UPDATE_INTERVAL_MS: u64 = 200;

/// Configuration for progress tracking and rendering.
///
/// Every field has a default, so a partial file only overrides what it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    /// Minimum time between two update notifications (default: 200ms).
    pub interval_ms: u64,
    /// Progress glyphs.
    pub theme: Theme,
    /// Diagnostic count labels.
    pub diagnostics: DiagnosticTheme,
    /// Whether completed tasks keep their entry (default: retain).
    pub retention: RetentionPolicy,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_UPDATE_INTERVAL_MS,
            theme: Theme::default(),
            diagnostics: DiagnosticTheme::default(),
            retention: RetentionPolicy::default(),
        }
    }
}

impl StatusConfig {
    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval_ms = interval.as_millis() as u64;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = retention;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProgressError;
    use std::io::Write;

    #[test]
    fn test_empty_config_is_default() {
        let config = StatusConfig::from_toml_str("").unwrap();
        assert_eq!(config, StatusConfig::default());
        assert_eq!(config.interval(), Duration::from_millis(200));
    }

    #[test]
    fn test_partial_config_merges_over_defaults() {
        let config = StatusConfig::from_toml_str(
            r#"
            interval_ms = 500
            retention = "evict_on_complete"

            [theme]
            show_name = true
            "#,
        )
        .unwrap();

        assert_eq!(config.interval_ms, 500);
        assert_eq!(config.retention, RetentionPolicy::EvictOnComplete);
        assert!(config.theme.show_name);
        assert_eq!(config.theme.ramp, Theme::default().ramp);
        assert_eq!(config.diagnostics, DiagnosticTheme::default());
    }

    #[test]
    fn test_invalid_config() {
        let result = StatusConfig::from_toml_str("interval_ms = \"soon\"");
        assert!(matches!(result, Err(ProgressError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[theme]\nidle = \"-\"\nramp = \"123\"").unwrap();

        let config = StatusConfig::load(file.path()).unwrap();
        assert_eq!(config.theme.idle, "-");
        assert_eq!(config.theme.ramp, "123");
    }

    #[test]
    fn test_load_missing_file() {
        let result = StatusConfig::load("/nonexistent/lsp-progress.toml");
        assert!(matches!(result, Err(ProgressError::Io(_))));
    }

    #[test]
    fn test_builders() {
        let config = StatusConfig::default()
            .with_interval(Duration::from_millis(50))
            .with_theme(Theme::default().with_show_name(true))
            .with_retention(RetentionPolicy::EvictOnComplete);

        assert_eq!(config.interval_ms, 50);
        assert!(config.theme.show_name);
        assert_eq!(config.retention, RetentionPolicy::EvictOnComplete);
    }
}
