//! Remote document service boundary.

use crate::core::error::DocError;
use crate::models::{
    BreadcrumbItem, DocContent, Feedback, RecentDoc, RecommendationItem, SearchParams,
    SearchResponse, UpdateItem, WireNode,
};

/// Backend that serves the document tree, document bodies, search and the
/// announcement board.
///
/// Stores are generic over this trait so they can run against the HTTP
/// implementation in the browser and against in-memory fakes in tests.
/// Responses are treated as consistent snapshots keyed by path.
#[allow(async_fn_in_trait)]
pub trait DocService {
    /// `GET /docs/tree`
    async fn fetch_tree(&self) -> Result<WireNode, DocError>;

    /// `GET /docs/subtree/{path}`, the immediate children of one directory.
    async fn fetch_subtree(&self, path: &str) -> Result<Vec<WireNode>, DocError>;

    /// `GET /docs/content/{path}`
    async fn fetch_content(&self, path: &str) -> Result<DocContent, DocError>;

    /// `GET /docs/breadcrumb/{path}`
    async fn fetch_breadcrumb(&self, path: &str) -> Result<Vec<BreadcrumbItem>, DocError>;

    /// `GET /docs/recent?limit=`
    async fn fetch_recent(&self, limit: usize) -> Result<Vec<RecentDoc>, DocError>;

    /// `GET /search`
    async fn search(&self, params: &SearchParams) -> Result<SearchResponse, DocError>;

    /// `GET /search/suggest?q=&limit=`
    async fn suggest(&self, query: &str, limit: u32) -> Result<Vec<String>, DocError>;

    /// `GET /announcements/updates`, newest first.
    async fn fetch_updates(&self) -> Result<Vec<UpdateItem>, DocError>;

    /// `GET /announcements/recommendations`
    async fn fetch_recommendations(&self) -> Result<Vec<RecommendationItem>, DocError>;

    /// `POST /feedback`
    async fn submit_feedback(&self, feedback: &Feedback) -> Result<(), DocError>;
}
