//! Data models and types for the application.
//!
//! Contains domain types for:
//! - [`DocNode`], [`WireNode`] - Cached document tree and its wire shape
//! - [`SearchParams`], [`SearchResultSet`] - Search requests and result pages
//! - [`DocContent`], [`BreadcrumbItem`], [`RecentDoc`] - Document payloads
//! - [`ReadingSession`], [`ReadingSettings`] - Persisted reader state
//! - [`UpdateItem`], [`RecommendationItem`], [`Feedback`] - Announcement board

mod announcement;
mod document;
mod reading;
mod search;
mod tree;

pub use announcement::{Feedback, FeedbackKind, RecommendationItem, UpdateItem, newest_update};
pub use document::{BreadcrumbItem, DocContent, DocKind, RecentDoc};
pub use reading::{
    ReaderTheme, ReadingPosition, ReadingSession, ReadingSettings, ReadingSettingsPatch,
};
pub use search::{
    SearchMatch, SearchMeta, SearchParams, SearchResponse, SearchResult, SearchResultSet,
    SortOrder,
};
pub(crate) use tree::normalize_children;
pub use tree::{DocNode, SubtreeResponse, WireNode};
