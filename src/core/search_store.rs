//! Search and pagination state.
//!
//! A result page and its metadata live in one signal and are always written
//! together. Every request takes a ticket from a [`RequestSeq`]; when its
//! response arrives it is applied only if no newer request was issued in
//! the meantime.

use std::sync::Arc;

use leptos::prelude::*;
use tracing::{debug, warn};

use crate::core::DocService;
use crate::core::error::DocError;
use crate::models::{SearchMeta, SearchParams, SearchResult, SearchResultSet};
use crate::utils::RequestSeq;

/// What [`SearchStore::search`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The response was applied.
    Applied { results: usize },
    /// The query was blank; the result set was cleared without a request.
    Empty,
    /// A newer search was issued before this one answered.
    Superseded,
    /// The request failed; results were reset and the error recorded.
    Failed(DocError),
}

/// Search result store.
pub struct SearchStore<S> {
    service: Arc<S>,
    result_set: RwSignal<SearchResultSet>,
    last_params: RwSignal<Option<SearchParams>>,
    loading: RwSignal<bool>,
    error: RwSignal<Option<String>>,
    suggestions: RwSignal<Vec<String>>,
    /// Kept apart from `error` so a failed completion never sits next to
    /// a result page.
    suggest_error: RwSignal<Option<String>>,
    seq: RequestSeq,
    suggest_seq: RequestSeq,
}

impl<S> Clone for SearchStore<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            result_set: self.result_set,
            last_params: self.last_params,
            loading: self.loading,
            error: self.error,
            suggestions: self.suggestions,
            suggest_error: self.suggest_error,
            seq: self.seq.clone(),
            suggest_seq: self.suggest_seq.clone(),
        }
    }
}

impl<S: DocService> SearchStore<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self {
            service,
            result_set: RwSignal::new(SearchResultSet::default()),
            last_params: RwSignal::new(None),
            loading: RwSignal::new(false),
            error: RwSignal::new(None),
            suggestions: RwSignal::new(Vec::new()),
            suggest_error: RwSignal::new(None),
            seq: RequestSeq::new(),
            suggest_seq: RequestSeq::new(),
        }
    }

    // =========================================================================
    // Read Access
    // =========================================================================

    /// Current page and its metadata, as one value.
    pub fn result_set(&self) -> ReadSignal<SearchResultSet> {
        self.result_set.read_only()
    }

    pub fn results(&self) -> Signal<Vec<SearchResult>> {
        let result_set = self.result_set;
        Signal::derive(move || result_set.with(|set| set.results.clone()))
    }

    pub fn meta(&self) -> Signal<SearchMeta> {
        let result_set = self.result_set;
        Signal::derive(move || result_set.with(|set| set.meta))
    }

    /// Parameters of the last non-blank search.
    pub fn last_params(&self) -> ReadSignal<Option<SearchParams>> {
        self.last_params.read_only()
    }

    pub fn loading(&self) -> ReadSignal<bool> {
        self.loading.read_only()
    }

    pub fn error(&self) -> ReadSignal<Option<String>> {
        self.error.read_only()
    }

    pub fn suggestions(&self) -> ReadSignal<Vec<String>> {
        self.suggestions.read_only()
    }

    /// Why the last suggestion request failed, if it did.
    pub fn suggest_error(&self) -> ReadSignal<Option<String>> {
        self.suggest_error.read_only()
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Run a search and apply its page if it is still the latest request.
    pub async fn search(&self, params: SearchParams) -> SearchOutcome {
        let ticket = self.seq.issue();
        let per_page = params.per_page();

        if params.is_blank() {
            self.result_set.set(SearchResultSet::empty(per_page));
            self.last_params.set(None);
            self.loading.set(false);
            self.error.set(None);
            return SearchOutcome::Empty;
        }

        self.last_params.set(Some(params.clone()));
        self.loading.set(true);
        self.error.set(None);

        let response = self.service.search(&params).await;
        if !self.seq.is_current(ticket) {
            debug!(query = %params.q, page = params.page(), "discarding superseded search response");
            return SearchOutcome::Superseded;
        }
        self.loading.set(false);

        match response {
            Ok(response) => {
                let set = response.into_result_set(&params);
                let results = set.results.len();
                debug!(query = %params.q, results, total = set.meta.total, "search applied");
                self.result_set.set(set);
                SearchOutcome::Applied { results }
            }
            Err(err) => {
                warn!(query = %params.q, error = %err, "search failed");
                self.result_set.set(SearchResultSet::empty(per_page));
                self.error.set(Some(err.to_string()));
                SearchOutcome::Failed(err)
            }
        }
    }

    /// Re-run the last search on another page.
    ///
    /// The page is clamped to the known page count. Returns `None` when
    /// there is no previous search.
    pub async fn go_to_page(&self, page: u32) -> Option<SearchOutcome> {
        let params = self.last_params.get_untracked()?;
        let total_pages = self.result_set.with_untracked(|set| set.meta.total_pages);
        let page = if total_pages > 0 {
            page.clamp(1, total_pages)
        } else {
            page.max(1)
        };
        Some(self.search(params.with_page(page)).await)
    }

    /// Move to the following page, if there is one.
    pub async fn next_page(&self) -> Option<SearchOutcome> {
        let meta = self.result_set.with_untracked(|set| set.meta);
        if !meta.has_next() {
            return None;
        }
        self.go_to_page(meta.page + 1).await
    }

    /// Move to the preceding page, if there is one.
    pub async fn prev_page(&self) -> Option<SearchOutcome> {
        let meta = self.result_set.with_untracked(|set| set.meta);
        if !meta.has_prev() {
            return None;
        }
        self.go_to_page(meta.page - 1).await
    }

    /// Fetch up to `limit` query completions. Blank input clears them
    /// without a request.
    pub async fn suggest(&self, query: &str, limit: u32) {
        let ticket = self.suggest_seq.issue();
        let query = query.trim();
        if query.is_empty() {
            self.suggestions.set(Vec::new());
            self.suggest_error.set(None);
            return;
        }

        let result = self.service.suggest(query, limit).await;
        if !self.suggest_seq.is_current(ticket) {
            return;
        }
        match result {
            Ok(suggestions) => {
                self.suggestions.set(suggestions);
                self.suggest_error.set(None);
            }
            Err(err) => {
                warn!(query, error = %err, "failed to fetch suggestions");
                self.suggestions.set(Vec::new());
                self.suggest_error.set(Some(err.to_string()));
            }
        }
    }

    /// Drop the current results and any pending search.
    pub fn clear(&self) {
        self.seq.invalidate();
        self.result_set.set(SearchResultSet::default());
        self.last_params.set(None);
        self.loading.set(false);
        self.error.set(None);
    }

    /// Clear results, suggestions and errors; in-flight responses are dropped.
    pub fn reset(&self) {
        self.seq.invalidate();
        self.suggest_seq.invalidate();
        self.result_set.set(SearchResultSet::default());
        self.last_params.set(None);
        self.loading.set(false);
        self.error.set(None);
        self.suggestions.set(Vec::new());
        self.suggest_error.set(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::FetchError;
    use crate::core::testing::{FakeDocService, poll_once};
    use serde_json::json;

    fn page_of(names: &[&str], page: u32, total_pages: u32) -> serde_json::Value {
        let results: Vec<_> = names
            .iter()
            .map(|n| json!({ "path": n, "name": n, "relevance_score": 1.0 }))
            .collect();
        json!({
            "results": results,
            "total": 25,
            "total_matches": 40,
            "page": page,
            "per_page": 10,
            "total_pages": total_pages
        })
    }

    fn paths(store: &SearchStore<FakeDocService>) -> Vec<String> {
        store
            .result_set()
            .with_untracked(|set| set.results.iter().map(|r| r.path.clone()).collect())
    }

    #[tokio::test]
    async fn test_search_applies_results_and_meta_together() {
        let service = Arc::new(FakeDocService::default());
        service.set_search("tree", page_of(&["a.md", "b.md"], 1, 3));
        let store = SearchStore::new(Arc::clone(&service));

        let outcome = store.search(SearchParams::new("tree")).await;

        assert_eq!(outcome, SearchOutcome::Applied { results: 2 });
        let set = store.result_set().get_untracked();
        assert_eq!(set.meta.total, 25);
        assert_eq!(set.meta.total_pages, 3);
        assert!(set.results.len() <= set.meta.per_page as usize);
        assert!(!store.loading().get_untracked());
        assert_eq!(store.meta().get_untracked(), set.meta);
        assert_eq!(store.results().get_untracked(), set.results);
    }

    #[tokio::test]
    async fn test_blank_query_skips_request() {
        let service = Arc::new(FakeDocService::default());
        let store = SearchStore::new(Arc::clone(&service));

        let outcome = store.search(SearchParams::new("").with_page(1)).await;

        assert_eq!(outcome, SearchOutcome::Empty);
        assert_eq!(service.total_calls(), 0);
        let set = store.result_set().get_untracked();
        assert!(set.results.is_empty());
        assert_eq!(set.meta.total, 0);
        assert_eq!(set.meta.page, 1);
        assert_eq!(set.meta.total_pages, 0);
    }

    #[tokio::test]
    async fn test_late_response_of_older_query_is_discarded() {
        let service = Arc::new(FakeDocService::default());
        service.set_search("alpha", page_of(&["alpha.md"], 1, 1));
        service.set_search("beta", page_of(&["beta.md"], 1, 1));
        let store = SearchStore::new(Arc::clone(&service));
        let release_alpha = service.hold("search:alpha");

        let alpha = store.search(SearchParams::new("alpha"));
        let mut alpha = std::pin::pin!(alpha);
        assert!(poll_once(alpha.as_mut()).is_pending());

        let beta = store.search(SearchParams::new("beta")).await;
        assert_eq!(beta, SearchOutcome::Applied { results: 1 });

        release_alpha.send(()).unwrap();
        assert_eq!(alpha.await, SearchOutcome::Superseded);

        assert_eq!(paths(&store), vec!["beta.md"]);
        assert_eq!(
            store.last_params().get_untracked().map(|p| p.q),
            Some("beta".to_string())
        );
        assert!(!store.loading().get_untracked());
    }

    #[tokio::test]
    async fn test_earlier_response_landing_first_is_not_applied() {
        let service = Arc::new(FakeDocService::default());
        service.set_search("alpha", page_of(&["alpha.md"], 1, 1));
        service.set_search("beta", page_of(&["beta.md"], 1, 1));
        let store = SearchStore::new(Arc::clone(&service));
        let release_alpha = service.hold("search:alpha");
        let release_beta = service.hold("search:beta");

        let alpha = store.search(SearchParams::new("alpha"));
        let mut alpha = std::pin::pin!(alpha);
        assert!(poll_once(alpha.as_mut()).is_pending());
        let beta = store.search(SearchParams::new("beta"));
        let mut beta = std::pin::pin!(beta);
        assert!(poll_once(beta.as_mut()).is_pending());

        release_alpha.send(()).unwrap();
        assert_eq!(alpha.await, SearchOutcome::Superseded);
        assert!(paths(&store).is_empty());
        assert!(store.loading().get_untracked());

        release_beta.send(()).unwrap();
        assert_eq!(beta.await, SearchOutcome::Applied { results: 1 });
        assert_eq!(paths(&store), vec!["beta.md"]);
    }

    #[tokio::test]
    async fn test_blank_query_supersedes_pending_search() {
        let service = Arc::new(FakeDocService::default());
        service.set_search("alpha", page_of(&["alpha.md"], 1, 1));
        let store = SearchStore::new(Arc::clone(&service));
        let release = service.hold("search:alpha");

        let alpha = store.search(SearchParams::new("alpha"));
        let mut alpha = std::pin::pin!(alpha);
        assert!(poll_once(alpha.as_mut()).is_pending());

        assert_eq!(store.search(SearchParams::new("  ")).await, SearchOutcome::Empty);
        release.send(()).unwrap();
        assert_eq!(alpha.await, SearchOutcome::Superseded);
        assert!(paths(&store).is_empty());
    }

    #[tokio::test]
    async fn test_failure_resets_to_zero_state() {
        let service = Arc::new(FakeDocService::default());
        service.set_search("ok", page_of(&["a.md"], 2, 3));
        service.fail_search("boom", FetchError::HttpError(500));
        let store = SearchStore::new(Arc::clone(&service));
        store.search(SearchParams::new("ok").with_page(2)).await;

        let outcome = store.search(SearchParams::new("boom")).await;

        assert_eq!(
            outcome,
            SearchOutcome::Failed(DocError::Transport(FetchError::HttpError(500)))
        );
        let set = store.result_set().get_untracked();
        assert!(set.results.is_empty());
        assert_eq!(set.meta, SearchMeta::zero(10));
        assert_eq!(store.error().get_untracked().as_deref(), Some("HTTP error: 500"));
        assert!(!store.loading().get_untracked());
    }

    #[tokio::test]
    async fn test_new_search_clears_error() {
        let service = Arc::new(FakeDocService::default());
        service.fail_search("boom", FetchError::Timeout);
        service.set_search("ok", page_of(&["a.md"], 1, 1));
        let store = SearchStore::new(Arc::clone(&service));

        store.search(SearchParams::new("boom")).await;
        assert!(store.error().get_untracked().is_some());
        store.search(SearchParams::new("ok")).await;
        assert_eq!(store.error().get_untracked(), None);
    }

    #[tokio::test]
    async fn test_pagination_reuses_last_params() {
        let service = Arc::new(FakeDocService::default());
        service.set_search("rust", page_of(&["p1.md"], 1, 2));
        let store = SearchStore::new(Arc::clone(&service));

        assert_eq!(store.prev_page().await, None);
        store
            .search(SearchParams::new("rust").with_doc_type("markdown"))
            .await;

        service.set_search("rust", page_of(&["p2.md"], 2, 2));
        assert_eq!(
            store.next_page().await,
            Some(SearchOutcome::Applied { results: 1 })
        );
        let params = store.last_params().get_untracked().unwrap();
        assert_eq!(params.page, Some(2));
        assert_eq!(params.doc_type.as_deref(), Some("markdown"));
        assert_eq!(paths(&store), vec!["p2.md"]);

        assert_eq!(store.next_page().await, None);
        assert_eq!(service.call_count("search:rust"), 2);
    }

    #[tokio::test]
    async fn test_go_to_page_clamps() {
        let service = Arc::new(FakeDocService::default());
        service.set_search("rust", page_of(&["p.md"], 1, 3));
        let store = SearchStore::new(Arc::clone(&service));

        assert_eq!(store.go_to_page(2).await, None);
        store.search(SearchParams::new("rust")).await;
        store.go_to_page(99).await;

        assert_eq!(store.last_params().get_untracked().unwrap().page, Some(3));
    }

    #[tokio::test]
    async fn test_suggestions() {
        let service = Arc::new(FakeDocService::default());
        service.set_suggestions("ru", &["rust", "ruby", "runtime", "rule", "run", "rune"]);
        let store = SearchStore::new(Arc::clone(&service));

        store.suggest("ru", 5).await;
        assert_eq!(store.suggestions().get_untracked().len(), 5);

        store.suggest("   ", 5).await;
        assert!(store.suggestions().get_untracked().is_empty());
        assert_eq!(service.call_count("suggest:ru"), 1);
    }

    #[tokio::test]
    async fn test_suggestion_failure_clears_list() {
        let service = Arc::new(FakeDocService::default());
        service.set_suggestions("ru", &["rust"]);
        let store = SearchStore::new(Arc::clone(&service));
        store.suggest("ru", 5).await;

        service.fail_suggestions("ru", FetchError::NetworkError("offline".into()));
        store.suggest("ru", 5).await;

        assert!(store.suggestions().get_untracked().is_empty());
        assert_eq!(
            store.suggest_error().get_untracked().as_deref(),
            Some("Network error: offline")
        );

        service.set_suggestions("ru", &["rust"]);
        store.suggest("ru", 5).await;
        assert_eq!(store.suggest_error().get_untracked(), None);
    }

    #[tokio::test]
    async fn test_suggestion_failure_leaves_results_without_error() {
        let service = Arc::new(FakeDocService::default());
        service.set_search("rust", page_of(&["rust.md"], 1, 1));
        service.fail_suggestions("rusty", FetchError::Timeout);
        let store = SearchStore::new(Arc::clone(&service));
        store.search(SearchParams::new("rust")).await;

        store.suggest("rusty", 5).await;

        assert_eq!(paths(&store), vec!["rust.md"]);
        assert_eq!(store.error().get_untracked(), None);
        assert_eq!(
            store.suggest_error().get_untracked().as_deref(),
            Some("Request timed out")
        );
    }

    #[tokio::test]
    async fn test_clear_resets_results() {
        let service = Arc::new(FakeDocService::default());
        service.set_search("rust", page_of(&["p.md"], 1, 1));
        let store = SearchStore::new(Arc::clone(&service));
        store.search(SearchParams::new("rust")).await;

        store.clear();

        assert!(store.result_set().get_untracked().is_empty());
        assert_eq!(store.last_params().get_untracked(), None);
        assert_eq!(store.next_page().await, None);
    }

    #[tokio::test]
    async fn test_reset_drops_in_flight_search() {
        let service = Arc::new(FakeDocService::default());
        service.set_search("alpha", page_of(&["alpha.md"], 1, 1));
        let store = SearchStore::new(Arc::clone(&service));
        let release = service.hold("search:alpha");

        let alpha = store.search(SearchParams::new("alpha"));
        let mut alpha = std::pin::pin!(alpha);
        assert!(poll_once(alpha.as_mut()).is_pending());

        store.reset();
        release.send(()).unwrap();

        assert_eq!(alpha.await, SearchOutcome::Superseded);
        assert_eq!(store.result_set().get_untracked(), SearchResultSet::default());
        assert!(!store.loading().get_untracked());
    }
}
