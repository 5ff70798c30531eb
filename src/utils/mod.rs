//! Browser and formatting helpers.
//!
//! Provides:
//! - [`fetch::fetch_json`] - JSON fetching with timeout
//! - [`RequestSeq`] - latest-issued-wins request tickets
//! - [`log::init`] - console-backed `tracing` subscriber
//! - [`url`] - path and query encoding for API URLs

pub mod dom;
pub mod fetch;
pub mod format;
pub mod log;
mod seq;
pub mod url;

pub use seq::RequestSeq;
