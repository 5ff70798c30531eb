//! Reading session types.
//!
//! Field names of the persisted records are camelCase to stay compatible
//! with entries written by earlier versions of the client.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::reading_defaults as defaults;

/// Color scheme of the reader pane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReaderTheme {
    #[default]
    Light,
    Dark,
    Sepia,
}

/// Display options of the reader pane.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReadingSettings {
    pub content_width: u32,
    pub font_size: u32,
    pub auto_hide_controls: bool,
    pub enable_auto_scroll: bool,
    pub theme: ReaderTheme,
    pub line_height: f64,
    pub paragraph_spacing: f64,
    pub margin_size: f64,
}

impl Default for ReadingSettings {
    fn default() -> Self {
        Self {
            content_width: defaults::CONTENT_WIDTH,
            font_size: defaults::FONT_SIZE,
            auto_hide_controls: defaults::AUTO_HIDE_CONTROLS,
            enable_auto_scroll: defaults::ENABLE_AUTO_SCROLL,
            theme: ReaderTheme::default(),
            line_height: defaults::LINE_HEIGHT,
            paragraph_spacing: defaults::PARAGRAPH_SPACING,
            margin_size: defaults::MARGIN_SIZE,
        }
    }
}

/// Partial update of [`ReadingSettings`]; `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReadingSettingsPatch {
    pub content_width: Option<u32>,
    pub font_size: Option<u32>,
    pub auto_hide_controls: Option<bool>,
    pub enable_auto_scroll: Option<bool>,
    pub theme: Option<ReaderTheme>,
    pub line_height: Option<f64>,
    pub paragraph_spacing: Option<f64>,
    pub margin_size: Option<f64>,
}

impl ReadingSettings {
    /// Overlay every present field of `patch`.
    pub fn apply(&mut self, patch: ReadingSettingsPatch) {
        if let Some(v) = patch.content_width {
            self.content_width = v;
        }
        if let Some(v) = patch.font_size {
            self.font_size = v;
        }
        if let Some(v) = patch.auto_hide_controls {
            self.auto_hide_controls = v;
        }
        if let Some(v) = patch.enable_auto_scroll {
            self.enable_auto_scroll = v;
        }
        if let Some(v) = patch.theme {
            self.theme = v;
        }
        if let Some(v) = patch.line_height {
            self.line_height = v;
        }
        if let Some(v) = patch.paragraph_spacing {
            self.paragraph_spacing = v;
        }
        if let Some(v) = patch.margin_size {
            self.margin_size = v;
        }
    }
}

/// Where the reader last stopped.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReadingPosition {
    pub path: String,
    /// Vertical scroll offset in pixels
    pub scroll: f64,
}

/// Complete reading session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReadingSession {
    pub is_immersive: bool,
    pub settings: ReadingSettings,
    pub last_position: Option<ReadingPosition>,
    /// Accumulated seconds per document path
    pub reading_time: BTreeMap<String, u64>,
}

impl ReadingSession {
    /// Seconds spent on `path`.
    pub fn reading_time(&self, path: &str) -> u64 {
        self.reading_time.get(path).copied().unwrap_or(0)
    }

    /// Seconds spent across all documents, saturating at `u64::MAX`.
    pub fn total_reading_time(&self) -> u64 {
        self.reading_time
            .values()
            .fold(0u64, |total, secs| total.saturating_add(*secs))
    }
}
