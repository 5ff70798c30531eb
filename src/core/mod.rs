//! Client-side state for the document browser.
//!
//! This module provides:
//! - [`DocStore`] lazy document tree, content and recent documents
//! - [`SearchStore`] search results with pagination and suggestions
//! - [`ReadingStore`] persisted reading session
//! - [`AnnouncementStore`] release notes, recommendations and feedback
//! - [`DocService`] the backend seam, implemented over HTTP by [`HttpDocService`]

mod announcement_store;
mod api;
mod doc_store;
pub mod error;
mod reading_store;
mod search_store;
mod service;
pub mod storage;
#[cfg(test)]
pub(crate) mod testing;
pub mod tree;

pub use announcement_store::AnnouncementStore;
pub use api::HttpDocService;
pub use doc_store::{DocStore, ExpandOutcome};
pub use reading_store::ReadingStore;
pub use search_store::{SearchOutcome, SearchStore};
pub use service::DocService;
pub use storage::{BrowserStorage, KeyValueStore, MemoryStorage};
pub use tree::{DocTree, MergeResult};
