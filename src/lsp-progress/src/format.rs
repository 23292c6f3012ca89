//! Status line formatting.
//!
//! A percentage is mapped onto a fixed ramp of glyphs by nearest-bucket
//! rounding; clients are rendered in name order.

use crate::{ClientInfo, ProgressStore};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Default glyph ramp, from just started to almost done.
pub const DEFAULT_RAMP: &str = "○◔◑◕●";

/// Default glyph for a client with nothing in progress.
pub const DEFAULT_IDLE: &str = "✓";

/// How a status line is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Prefix each glyph with the client name.
    pub show_name: bool,
    /// Glyphs ordered from 0% to 100%, one grapheme each.
    pub ramp: String,
    /// Glyph shown when a client is idle.
    pub idle: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            show_name: false,
            ramp: DEFAULT_RAMP.to_string(),
            idle: DEFAULT_IDLE.to_string(),
        }
    }
}

impl Theme {
    pub fn with_show_name(mut self, show_name: bool) -> Self {
        self.show_name = show_name;
        self
    }

    pub fn with_ramp(mut self, ramp: impl Into<String>) -> Self {
        self.ramp = ramp.into();
        self
    }

    pub fn with_idle(mut self, idle: impl Into<String>) -> Self {
        self.idle = idle.into();
        self
    }
}

/// Glyph for a percentage, or `idle` when there is none.
///
/// The index is `floor(0.5 + p / 100 * (len - 1))`, clamped to the ramp.
/// An empty ramp renders as an empty string.
pub fn icon<'a>(percentage: Option<u32>, ramp: &'a str, idle: &'a str) -> &'a str {
    let Some(percentage) = percentage else {
        return idle;
    };

    let glyphs: Vec<&str> = ramp.graphemes(true).collect();
    let Some(last) = glyphs.len().checked_sub(1) else {
        return "";
    };

    let index = (0.5 + f64::from(percentage) / 100.0 * last as f64).floor() as usize;
    glyphs[index.min(last)]
}

/// Render one glyph per client, sorted by name.
pub fn format_clients(store: &ProgressStore, clients: &[ClientInfo], theme: &Theme) -> String {
    let mut sorted: Vec<&ClientInfo> = clients.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    let parts: Vec<String> = sorted
        .into_iter()
        .map(|client| {
            let glyph = icon(store.min_percentage(&client.id), &theme.ramp, &theme.idle);
            if theme.show_name {
                format!("{} {}", glyph, client.name)
            } else {
                glyph.to_string()
            }
        })
        .collect();

    let separator = if theme.show_name { " " } else { "" };
    parts.join(separator)
}
