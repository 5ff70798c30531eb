//! In-memory document service for store tests.
//!
//! Responses are configured per endpoint and path. A request can be held
//! open with [`FakeDocService::hold`] until the returned sender fires (or is
//! dropped), which lets tests decide the order in which responses land.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll, Waker};

use serde_json::Value;
use tokio::sync::oneshot;

use crate::core::DocService;
use crate::core::error::{DocError, FetchError};
use crate::models::{
    BreadcrumbItem, DocContent, Feedback, RecentDoc, RecommendationItem, SearchParams,
    SearchResponse, UpdateItem, WireNode,
};

#[derive(Default)]
pub struct FakeDocService {
    tree: RefCell<Option<Result<WireNode, DocError>>>,
    subtrees: RefCell<HashMap<String, Result<Vec<WireNode>, DocError>>>,
    contents: RefCell<HashMap<String, Result<DocContent, DocError>>>,
    breadcrumbs: RefCell<HashMap<String, Result<Vec<BreadcrumbItem>, DocError>>>,
    recent: RefCell<Vec<RecentDoc>>,
    searches: RefCell<HashMap<String, Result<SearchResponse, DocError>>>,
    suggestions: RefCell<HashMap<String, Result<Vec<String>, DocError>>>,
    updates: RefCell<Option<Result<Vec<UpdateItem>, DocError>>>,
    recommendations: RefCell<Option<Result<Vec<RecommendationItem>, DocError>>>,
    feedback: RefCell<Vec<Feedback>>,
    feedback_failure: RefCell<Option<DocError>>,
    gates: RefCell<HashMap<String, oneshot::Receiver<()>>>,
    calls: RefCell<Vec<String>>,
}

fn parse<T: serde::de::DeserializeOwned>(value: Value) -> T {
    serde_json::from_value(value).expect("valid fixture")
}

impl FakeDocService {
    pub fn with_tree(tree: Value) -> Self {
        let service = Self::default();
        service.set_tree(tree);
        service
    }

    pub fn set_tree(&self, tree: Value) {
        *self.tree.borrow_mut() = Some(Ok(parse(tree)));
    }

    pub fn fail_tree(&self, err: FetchError) {
        *self.tree.borrow_mut() = Some(Err(err.into()));
    }

    pub fn set_subtree(&self, path: &str, children: Value) {
        self.subtrees
            .borrow_mut()
            .insert(path.to_string(), Ok(parse(children)));
    }

    pub fn fail_subtree(&self, path: &str, err: FetchError) {
        self.subtrees
            .borrow_mut()
            .insert(path.to_string(), Err(err.into()));
    }

    pub fn set_content(&self, path: &str, content: Value) {
        self.contents
            .borrow_mut()
            .insert(path.to_string(), Ok(parse(content)));
    }

    pub fn fail_breadcrumb(&self, path: &str, err: FetchError) {
        self.breadcrumbs
            .borrow_mut()
            .insert(path.to_string(), Err(err.into()));
    }

    pub fn set_recent(&self, recent: Value) {
        *self.recent.borrow_mut() = parse(recent);
    }

    pub fn set_search(&self, query: &str, response: Value) {
        self.searches
            .borrow_mut()
            .insert(query.to_string(), Ok(parse(response)));
    }

    pub fn fail_search(&self, query: &str, err: FetchError) {
        self.searches
            .borrow_mut()
            .insert(query.to_string(), Err(err.into()));
    }

    pub fn set_suggestions(&self, query: &str, suggestions: &[&str]) {
        self.suggestions.borrow_mut().insert(
            query.to_string(),
            Ok(suggestions.iter().map(|s| s.to_string()).collect()),
        );
    }

    pub fn fail_suggestions(&self, query: &str, err: FetchError) {
        self.suggestions
            .borrow_mut()
            .insert(query.to_string(), Err(err.into()));
    }

    pub fn set_updates(&self, updates: Value) {
        *self.updates.borrow_mut() = Some(Ok(parse(updates)));
    }

    pub fn fail_updates(&self, err: FetchError) {
        *self.updates.borrow_mut() = Some(Err(err.into()));
    }

    pub fn set_recommendations(&self, recommendations: Value) {
        *self.recommendations.borrow_mut() = Some(Ok(parse(recommendations)));
    }

    pub fn fail_feedback(&self, err: FetchError) {
        *self.feedback_failure.borrow_mut() = Some(err.into());
    }

    /// Feedback accepted so far.
    pub fn submitted_feedback(&self) -> Vec<Feedback> {
        self.feedback.borrow().clone()
    }

    /// Hold the next request for `key` (e.g. `"subtree:a"`) until the
    /// returned sender fires or is dropped.
    pub fn hold(&self, key: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.borrow_mut().insert(key.to_string(), rx);
        tx
    }

    pub fn call_count(&self, key: &str) -> usize {
        self.calls.borrow().iter().filter(|c| *c == key).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.borrow().len()
    }

    async fn enter(&self, key: String) {
        self.calls.borrow_mut().push(key.clone());
        let gate = self.gates.borrow_mut().remove(&key);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
    }
}

impl DocService for FakeDocService {
    async fn fetch_tree(&self) -> Result<WireNode, DocError> {
        self.enter("tree".to_string()).await;
        self.tree
            .borrow()
            .clone()
            .unwrap_or_else(|| Err(FetchError::HttpError(500).into()))
    }

    async fn fetch_subtree(&self, path: &str) -> Result<Vec<WireNode>, DocError> {
        self.enter(format!("subtree:{}", path)).await;
        self.subtrees
            .borrow()
            .get(path)
            .cloned()
            .unwrap_or_else(|| Err(DocError::NotFound(path.to_string())))
    }

    async fn fetch_content(&self, path: &str) -> Result<DocContent, DocError> {
        self.enter(format!("content:{}", path)).await;
        self.contents
            .borrow()
            .get(path)
            .cloned()
            .unwrap_or_else(|| Err(DocError::NotFound(path.to_string())))
    }

    async fn fetch_breadcrumb(&self, path: &str) -> Result<Vec<BreadcrumbItem>, DocError> {
        self.enter(format!("breadcrumb:{}", path)).await;
        self.breadcrumbs
            .borrow()
            .get(path)
            .cloned()
            .unwrap_or_else(|| Ok(BreadcrumbItem::trail(path)))
    }

    async fn fetch_recent(&self, limit: usize) -> Result<Vec<RecentDoc>, DocError> {
        self.enter("recent".to_string()).await;
        Ok(self.recent.borrow().iter().take(limit).cloned().collect())
    }

    async fn search(&self, params: &SearchParams) -> Result<SearchResponse, DocError> {
        let query = params.q.trim().to_string();
        self.enter(format!("search:{}", query)).await;
        self.searches
            .borrow()
            .get(&query)
            .cloned()
            .unwrap_or_else(|| Ok(SearchResponse::default()))
    }

    async fn suggest(&self, query: &str, limit: u32) -> Result<Vec<String>, DocError> {
        self.enter(format!("suggest:{}", query)).await;
        self.suggestions
            .borrow()
            .get(query)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
            .map(|mut s| {
                s.truncate(limit as usize);
                s
            })
    }

    async fn fetch_updates(&self) -> Result<Vec<UpdateItem>, DocError> {
        self.enter("updates".to_string()).await;
        self.updates.borrow().clone().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn fetch_recommendations(&self) -> Result<Vec<RecommendationItem>, DocError> {
        self.enter("recommendations".to_string()).await;
        self.recommendations
            .borrow()
            .clone()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn submit_feedback(&self, feedback: &Feedback) -> Result<(), DocError> {
        self.enter("feedback".to_string()).await;
        if let Some(err) = self.feedback_failure.borrow().clone() {
            return Err(err);
        }
        self.feedback.borrow_mut().push(feedback.clone());
        Ok(())
    }
}

/// Poll a future once without a runtime, to let it run up to its first
/// suspension point.
pub fn poll_once<F: Future>(fut: Pin<&mut F>) -> Poll<F::Output> {
    let mut cx = Context::from_waker(Waker::noop());
    fut.poll(&mut cx)
}
