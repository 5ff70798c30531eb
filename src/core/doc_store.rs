//! Document tree cache and the current-document store.
//!
//! [`DocStore`] owns the cached [`DocTree`], a per-path map of in-flight
//! subtree fetches, and the document currently open in the reader. All
//! state lives in Leptos signals so components re-render on change; the
//! async operations only touch those signals after their fetch resumes,
//! which keeps every read-modify-write inside a single synchronous step.

use std::collections::HashMap;
use std::sync::Arc;

use leptos::prelude::*;
use tracing::{debug, info, warn};

use crate::config::RECENT_DOCS_LIMIT;
use crate::core::DocService;
use crate::core::error::DocError;
use crate::core::tree::{DocTree, MergeResult};
use crate::models::{BreadcrumbItem, DocContent, RecentDoc};
use crate::utils::RequestSeq;

/// What [`DocStore::expand_node`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExpandOutcome {
    /// The fetched children were merged into the node.
    Expanded { children: usize },
    /// A fetch for this path is already outstanding; nothing was sent.
    AlreadyLoading,
    /// No node with this path is cached.
    NotFound,
    /// The node is a document, not a directory.
    NotDirectory,
    /// The fetch succeeded but the node left the tree in the meantime
    /// (root reloaded or store reset).
    Abandoned,
    /// The fetch failed; the node stays unloaded so a later call retries.
    Failed(DocError),
}

/// Marks a path as loading for as long as it lives.
///
/// Dropping the guard clears the mark, so the loading indicator is reset on
/// success, failure and cancellation alike. A guard that outlived a reset
/// leaves the map alone: the reset already cleared it and the path may
/// belong to a newer fetch.
struct LoadingGuard {
    loading: RwSignal<HashMap<String, bool>>,
    path: String,
    epoch: RequestSeq,
    started: u64,
}

impl LoadingGuard {
    fn start(loading: RwSignal<HashMap<String, bool>>, path: &str, epoch: &RequestSeq) -> Self {
        loading.update(|map| {
            map.insert(path.to_string(), true);
        });
        Self {
            loading,
            path: path.to_string(),
            epoch: epoch.clone(),
            started: epoch.current(),
        }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        if !self.epoch.is_current(self.started) {
            return;
        }
        let path = std::mem::take(&mut self.path);
        self.loading.try_update(|map| {
            map.remove(&path);
        });
    }
}

/// Document tree cache.
///
/// Cheap to clone: clones share the same signals and service.
pub struct DocStore<S> {
    service: Arc<S>,
    tree: RwSignal<Option<DocTree>>,
    loading_paths: RwSignal<HashMap<String, bool>>,
    tree_loading: RwSignal<bool>,
    current_doc: RwSignal<Option<DocContent>>,
    breadcrumb: RwSignal<Vec<BreadcrumbItem>>,
    recent: RwSignal<Vec<RecentDoc>>,
    content_loading: RwSignal<bool>,
    error: RwSignal<Option<String>>,
    /// Bumped by `reset()`; work started in an older epoch is discarded.
    epoch: RequestSeq,
    /// Only the latest `load_root` clears `tree_loading`.
    root_seq: RequestSeq,
    content_seq: RequestSeq,
}

impl<S> Clone for DocStore<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            tree: self.tree,
            loading_paths: self.loading_paths,
            tree_loading: self.tree_loading,
            current_doc: self.current_doc,
            breadcrumb: self.breadcrumb,
            recent: self.recent,
            content_loading: self.content_loading,
            error: self.error,
            epoch: self.epoch.clone(),
            root_seq: self.root_seq.clone(),
            content_seq: self.content_seq.clone(),
        }
    }
}

impl<S: DocService> DocStore<S> {
    /// Create an empty store backed by `service`.
    pub fn new(service: Arc<S>) -> Self {
        Self {
            service,
            tree: RwSignal::new(None),
            loading_paths: RwSignal::new(HashMap::new()),
            tree_loading: RwSignal::new(false),
            current_doc: RwSignal::new(None),
            breadcrumb: RwSignal::new(Vec::new()),
            recent: RwSignal::new(Vec::new()),
            content_loading: RwSignal::new(false),
            error: RwSignal::new(None),
            epoch: RequestSeq::new(),
            root_seq: RequestSeq::new(),
            content_seq: RequestSeq::new(),
        }
    }

    // =========================================================================
    // Read Access
    // =========================================================================

    /// Cached tree (`None` until the first successful [`load_root`](Self::load_root)).
    pub fn tree(&self) -> ReadSignal<Option<DocTree>> {
        self.tree.read_only()
    }

    /// Paths with an outstanding subtree fetch.
    pub fn loading_paths(&self) -> ReadSignal<HashMap<String, bool>> {
        self.loading_paths.read_only()
    }

    pub fn tree_loading(&self) -> ReadSignal<bool> {
        self.tree_loading.read_only()
    }

    pub fn current_doc(&self) -> ReadSignal<Option<DocContent>> {
        self.current_doc.read_only()
    }

    pub fn breadcrumb(&self) -> ReadSignal<Vec<BreadcrumbItem>> {
        self.breadcrumb.read_only()
    }

    pub fn recent(&self) -> ReadSignal<Vec<RecentDoc>> {
        self.recent.read_only()
    }

    pub fn content_loading(&self) -> ReadSignal<bool> {
        self.content_loading.read_only()
    }

    /// Last error message (last write wins).
    pub fn error(&self) -> ReadSignal<Option<String>> {
        self.error.read_only()
    }

    /// Whether a subtree fetch for `path` is outstanding (untracked).
    pub fn is_loading(&self, path: &str) -> bool {
        self.loading_paths
            .with_untracked(|map| map.get(path).copied().unwrap_or(false))
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Load the tree and the recent-documents list.
    pub async fn init(&self) {
        // Failure is already recorded in `error`.
        let _ = self.load_root().await;
        self.load_recent(RECENT_DOCS_LIMIT).await;
    }

    /// Drop all cached state. Responses to requests issued before the reset
    /// are discarded when they arrive.
    pub fn reset(&self) {
        self.epoch.invalidate();
        self.content_seq.invalidate();
        self.tree.set(None);
        self.loading_paths.set(HashMap::new());
        self.tree_loading.set(false);
        self.current_doc.set(None);
        self.breadcrumb.set(Vec::new());
        self.recent.set(Vec::new());
        self.content_loading.set(false);
        self.error.set(None);
        debug!("document store reset");
    }

    // =========================================================================
    // Tree
    // =========================================================================

    /// Fetch the full tree and replace the cached one.
    ///
    /// On failure the previous tree is kept and the error recorded. When two
    /// loads overlap, the one that completes last wins.
    pub async fn load_root(&self) -> Result<(), DocError> {
        let epoch = self.epoch.current();
        let ticket = self.root_seq.issue();
        self.tree_loading.set(true);
        self.error.set(None);

        let result = self.service.fetch_tree().await;
        if !self.epoch.is_current(epoch) {
            debug!("discarding tree snapshot requested before reset");
            return Ok(());
        }
        if self.root_seq.is_current(ticket) {
            self.tree_loading.set(false);
        }

        match result {
            Ok(snapshot) => {
                let tree = DocTree::from_snapshot(snapshot);
                info!(nodes = tree.node_count(), "document tree loaded");
                self.tree.set(Some(tree));
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "failed to load document tree");
                self.error.set(Some(err.to_string()));
                Err(err)
            }
        }
    }

    /// Fetch the children of the directory at `path` and merge them in.
    ///
    /// At most one fetch per path is outstanding: a call made while one is
    /// in flight returns [`ExpandOutcome::AlreadyLoading`] immediately.
    /// Fetch failures are not recorded as store errors.
    pub async fn expand_node(&self, path: &str) -> ExpandOutcome {
        let is_directory = self.tree.with_untracked(|tree| {
            tree.as_ref()
                .and_then(|t| t.find(path))
                .map(|node| node.is_directory)
        });
        match is_directory {
            None => {
                debug!(path, "expand skipped: node not found");
                return ExpandOutcome::NotFound;
            }
            Some(false) => return ExpandOutcome::NotDirectory,
            Some(true) => {}
        }
        if self.is_loading(path) {
            debug!(path, "expand skipped: fetch already in flight");
            return ExpandOutcome::AlreadyLoading;
        }

        let epoch = self.epoch.current();
        let _guard = LoadingGuard::start(self.loading_paths, path, &self.epoch);
        let children = match self.service.fetch_subtree(path).await {
            Ok(children) => children,
            Err(err) => {
                warn!(path, error = %err, "subtree fetch failed");
                return ExpandOutcome::Failed(err);
            }
        };
        if !self.epoch.is_current(epoch) {
            info!(path, "subtree merge abandoned: store was reset");
            return ExpandOutcome::Abandoned;
        }

        let merged = self
            .tree
            .try_update(|tree| tree.as_mut().map(|t| t.merge_children(path, children)))
            .flatten();
        match merged {
            Some(MergeResult::Merged { children }) => {
                debug!(path, children, "subtree merged");
                ExpandOutcome::Expanded { children }
            }
            _ => {
                info!(path, "subtree merge abandoned: node no longer in tree");
                ExpandOutcome::Abandoned
            }
        }
    }

    /// Fetch the most recently modified documents.
    pub async fn load_recent(&self, limit: usize) {
        let epoch = self.epoch.current();
        let result = self.service.fetch_recent(limit).await;
        if !self.epoch.is_current(epoch) {
            return;
        }
        match result {
            Ok(docs) => self.recent.set(docs),
            Err(err) => {
                warn!(error = %err, "failed to load recent documents");
                self.error.set(Some(err.to_string()));
            }
        }
    }

    // =========================================================================
    // Current Document
    // =========================================================================

    /// Open the document at `path` together with its breadcrumb trail.
    ///
    /// The previous document is cleared immediately so it is never shown
    /// under the new path. If another document is opened before this one
    /// arrives, this response is dropped.
    pub async fn load_content(&self, path: &str) {
        let ticket = self.content_seq.issue();
        self.content_loading.set(true);
        self.error.set(None);
        self.current_doc.set(None);

        let result = self.service.fetch_content(path).await;
        let breadcrumb = match &result {
            Ok(_) => match self.service.fetch_breadcrumb(path).await {
                Ok(items) => items,
                Err(err) => {
                    warn!(path, error = %err, "breadcrumb fetch failed, deriving from path");
                    BreadcrumbItem::trail(path)
                }
            },
            Err(_) => Vec::new(),
        };

        if !self.content_seq.is_current(ticket) {
            debug!(path, "discarding superseded document response");
            return;
        }
        self.content_loading.set(false);

        match result {
            Ok(doc) => {
                self.current_doc.set(Some(doc));
                self.breadcrumb.set(breadcrumb);
            }
            Err(err) => {
                warn!(path, error = %err, "failed to load document");
                self.current_doc.set(None);
                self.breadcrumb.set(Vec::new());
                self.error.set(Some(err.to_string()));
            }
        }
    }
}
