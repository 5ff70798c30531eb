//! Application configuration.
//!
//! Centralizes all configuration constants used throughout the application.

// =============================================================================
// Application Metadata
// =============================================================================

/// Application name displayed in the header.
pub const APP_NAME: &str = "docshelf";

// =============================================================================
// UI Configuration
// =============================================================================

/// Icon set used by the UI.
///
/// - `Bootstrap` - Familiar, slightly bolder
/// - `Lucide` - Minimal, thin strokes (default)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(dead_code)]
pub enum IconTheme {
    Bootstrap,
    #[default]
    Lucide,
}

/// Current icon theme used throughout the application.
pub const ICON_THEME: IconTheme = IconTheme::Lucide;

// =============================================================================
// Network Configuration
// =============================================================================

/// Base URL of the document service API.
pub const API_BASE_URL: &str = "/api";

/// Fetch request timeout in milliseconds.
pub const FETCH_TIMEOUT_MS: i32 = 100_000;

// =============================================================================
// Document Tree
// =============================================================================

/// Number of recently modified documents loaded on init.
pub const RECENT_DOCS_LIMIT: usize = 10;

// =============================================================================
// Search
// =============================================================================

/// Search defaults.
pub mod search {
    /// Page size used when a query does not specify one.
    pub const DEFAULT_PER_PAGE: u32 = 10;
    /// Maximum number of suggestions requested per keystroke.
    pub const DEFAULT_SUGGESTION_LIMIT: u32 = 5;
}

// =============================================================================
// Persisted State
// =============================================================================

/// localStorage keys.
///
/// Each concern is persisted under its own key so that a corrupt entry only
/// affects that concern on restore.
pub mod storage_keys {
    /// Immersive mode flag (`"true"` / `"false"`).
    pub const IMMERSIVE: &str = "reading-immersive";
    /// Display settings (JSON object).
    pub const SETTINGS: &str = "reading-settings";
    /// Last reading position (JSON `{path, scroll}`).
    pub const POSITION: &str = "reading-position";
    /// Accumulated reading time (JSON map of path to seconds).
    pub const READING_TIME: &str = "reading-time";
    /// When the release notes were last opened (RFC 3339).
    pub const LAST_VIEWED_UPDATE: &str = "announcements-last-viewed";
}

/// Default display settings for the reader.
pub mod reading_defaults {
    /// Content column width in percent.
    pub const CONTENT_WIDTH: u32 = 70;
    /// Base font size in pixels.
    pub const FONT_SIZE: u32 = 16;
    pub const AUTO_HIDE_CONTROLS: bool = true;
    pub const ENABLE_AUTO_SCROLL: bool = false;
    pub const LINE_HEIGHT: f64 = 1.6;
    pub const PARAGRAPH_SPACING: f64 = 1.2;
    /// Side margin in rem.
    pub const MARGIN_SIZE: f64 = 2.0;
}

/// Interval at which the reader adds time to the open document (seconds).
pub const READING_TICK_SECS: u32 = 15;
