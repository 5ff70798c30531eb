//! HTTP implementation of [`DocService`].

use tracing::debug;

use crate::config::API_BASE_URL;
use crate::core::DocService;
use crate::core::error::DocError;
use crate::models::{
    BreadcrumbItem, DocContent, Feedback, RecentDoc, RecommendationItem, SearchParams,
    SearchResponse, SubtreeResponse, UpdateItem, WireNode,
};
use crate::utils::fetch::{fetch_json, post_json};
use crate::utils::url::{encode_path, with_query};

/// Document service backed by the JSON API under `base_url`.
#[derive(Clone, Debug)]
pub struct HttpDocService {
    base_url: String,
}

impl Default for HttpDocService {
    fn default() -> Self {
        Self::new(API_BASE_URL)
    }
}

impl HttpDocService {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    fn tree_url(&self) -> String {
        format!("{}/docs/tree", self.base_url)
    }

    fn doc_url(&self, endpoint: &str, path: &str) -> String {
        format!("{}/docs/{}/{}", self.base_url, endpoint, encode_path(path))
    }

    fn recent_url(&self, limit: usize) -> String {
        with_query(
            &format!("{}/docs/recent", self.base_url),
            [("limit", limit.to_string())],
        )
    }

    fn search_url(&self, params: &SearchParams) -> String {
        with_query(&format!("{}/search", self.base_url), params.query_pairs())
    }

    fn suggest_url(&self, query: &str, limit: u32) -> String {
        with_query(
            &format!("{}/search/suggest", self.base_url),
            [("q", query.to_string()), ("limit", limit.to_string())],
        )
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

impl DocService for HttpDocService {
    async fn fetch_tree(&self) -> Result<WireNode, DocError> {
        Ok(fetch_json(&self.tree_url()).await?)
    }

    async fn fetch_subtree(&self, path: &str) -> Result<Vec<WireNode>, DocError> {
        let url = self.doc_url("subtree", path);
        debug!(%url, "fetching subtree");
        fetch_json::<SubtreeResponse>(&url)
            .await
            .map(|response| response.children)
            .map_err(|err| DocError::from_fetch(path, err))
    }

    async fn fetch_content(&self, path: &str) -> Result<DocContent, DocError> {
        fetch_json(&self.doc_url("content", path))
            .await
            .map_err(|err| DocError::from_fetch(path, err))
    }

    async fn fetch_breadcrumb(&self, path: &str) -> Result<Vec<BreadcrumbItem>, DocError> {
        fetch_json(&self.doc_url("breadcrumb", path))
            .await
            .map_err(|err| DocError::from_fetch(path, err))
    }

    async fn fetch_recent(&self, limit: usize) -> Result<Vec<RecentDoc>, DocError> {
        Ok(fetch_json(&self.recent_url(limit)).await?)
    }

    async fn search(&self, params: &SearchParams) -> Result<SearchResponse, DocError> {
        let url = self.search_url(params);
        debug!(%url, "searching");
        Ok(fetch_json(&url).await?)
    }

    async fn suggest(&self, query: &str, limit: u32) -> Result<Vec<String>, DocError> {
        Ok(fetch_json(&self.suggest_url(query, limit)).await?)
    }

    async fn fetch_updates(&self) -> Result<Vec<UpdateItem>, DocError> {
        Ok(fetch_json(&self.endpoint("announcements/updates")).await?)
    }

    async fn fetch_recommendations(&self) -> Result<Vec<RecommendationItem>, DocError> {
        Ok(fetch_json(&self.endpoint("announcements/recommendations")).await?)
    }

    async fn submit_feedback(&self, feedback: &Feedback) -> Result<(), DocError> {
        debug!(kind = feedback.kind.as_str(), "submitting feedback");
        Ok(post_json(&self.endpoint("feedback"), feedback).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SortOrder;

    #[test]
    fn test_doc_urls() {
        let service = HttpDocService::new("/api/");
        assert_eq!(service.tree_url(), "/api/docs/tree");
        assert_eq!(
            service.doc_url("subtree", "guides/getting started"),
            "/api/docs/subtree/guides/getting%20started"
        );
        assert_eq!(service.doc_url("content", "/a.md"), "/api/docs/content/a.md");
        assert_eq!(service.recent_url(10), "/api/docs/recent?limit=10");
    }

    #[test]
    fn test_search_url_omits_absent_params() {
        let service = HttpDocService::default();
        let params = SearchParams::new("rust wasm")
            .with_page(2)
            .sorted_by("relevance", SortOrder::Desc);
        assert_eq!(
            service.search_url(&params),
            "/api/search?q=rust%20wasm&page=2&sort_by=relevance&sort_order=desc"
        );
    }

    #[test]
    fn test_announcement_endpoints() {
        let service = HttpDocService::new("https://docs.example.com/api/");
        assert_eq!(
            service.endpoint("announcements/updates"),
            "https://docs.example.com/api/announcements/updates"
        );
        assert_eq!(service.endpoint("feedback"), "https://docs.example.com/api/feedback");
    }

    #[test]
    fn test_suggest_url() {
        let service = HttpDocService::default();
        assert_eq!(
            service.suggest_url("ru", 5),
            "/api/search/suggest?q=ru&limit=5"
        );
    }
}
