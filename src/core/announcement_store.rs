//! Announcement board: release notes, recommendations and reader feedback.
//!
//! The time the reader last looked at the release notes is persisted so the
//! "new updates" marker survives reloads.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use leptos::prelude::*;
use tracing::{debug, info, warn};

use crate::config::storage_keys;
use crate::core::DocService;
use crate::core::error::DocError;
use crate::core::storage::KeyValueStore;
use crate::models::{Feedback, RecommendationItem, UpdateItem, newest_update};
use crate::utils::RequestSeq;

/// Counts one outstanding request while alive.
struct Pending(RwSignal<usize>);

impl Pending {
    fn start(count: RwSignal<usize>) -> Self {
        count.update(|n| *n += 1);
        Self(count)
    }
}

impl Drop for Pending {
    fn drop(&mut self) {
        self.0.try_update(|n| *n = n.saturating_sub(1));
    }
}

pub struct AnnouncementStore<S, K: ?Sized> {
    service: Arc<S>,
    storage: Arc<K>,
    updates: RwSignal<Vec<UpdateItem>>,
    recommendations: RwSignal<Vec<RecommendationItem>>,
    last_viewed: RwSignal<Option<DateTime<Utc>>>,
    pending: RwSignal<usize>,
    error: RwSignal<Option<String>>,
    updates_seq: RequestSeq,
    recommendations_seq: RequestSeq,
}

impl<S, K: ?Sized> Clone for AnnouncementStore<S, K> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            storage: Arc::clone(&self.storage),
            updates: self.updates,
            recommendations: self.recommendations,
            last_viewed: self.last_viewed,
            pending: self.pending,
            error: self.error,
            updates_seq: self.updates_seq.clone(),
            recommendations_seq: self.recommendations_seq.clone(),
        }
    }
}

impl<S: DocService, K: KeyValueStore + ?Sized> AnnouncementStore<S, K> {
    /// Create the store, restoring the last-viewed time from `storage`.
    pub fn new(service: Arc<S>, storage: Arc<K>) -> Self {
        let last_viewed = restore_last_viewed(storage.as_ref());
        Self {
            service,
            storage,
            updates: RwSignal::new(Vec::new()),
            recommendations: RwSignal::new(Vec::new()),
            last_viewed: RwSignal::new(last_viewed),
            pending: RwSignal::new(0),
            error: RwSignal::new(None),
            updates_seq: RequestSeq::new(),
            recommendations_seq: RequestSeq::new(),
        }
    }

    // =========================================================================
    // Read Access
    // =========================================================================

    pub fn updates(&self) -> ReadSignal<Vec<UpdateItem>> {
        self.updates.read_only()
    }

    pub fn recommendations(&self) -> ReadSignal<Vec<RecommendationItem>> {
        self.recommendations.read_only()
    }

    pub fn last_viewed(&self) -> ReadSignal<Option<DateTime<Utc>>> {
        self.last_viewed.read_only()
    }

    /// True while any announcement request is outstanding.
    pub fn loading(&self) -> Signal<bool> {
        let pending = self.pending;
        Signal::derive(move || pending.get() > 0)
    }

    pub fn error(&self) -> ReadSignal<Option<String>> {
        self.error.read_only()
    }

    /// Whether an update was published after the reader last looked.
    ///
    /// A reader who has never opened the board gets no marker.
    pub fn has_new_updates(&self) -> Signal<bool> {
        let (updates, last_viewed) = (self.updates, self.last_viewed);
        Signal::derive(move || {
            let Some(seen) = last_viewed.get() else {
                return false;
            };
            updates
                .with(|items| newest_update(items))
                .is_some_and(|newest| newest > seen)
        })
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Load everything the board shows.
    pub async fn init(&self) {
        self.load_updates().await;
        self.load_recommendations().await;
    }

    /// Fetch the release notes. On failure the current list is kept.
    pub async fn load_updates(&self) {
        let ticket = self.updates_seq.issue();
        let _pending = Pending::start(self.pending);
        self.error.set(None);

        let result = self.service.fetch_updates().await;
        if !self.updates_seq.is_current(ticket) {
            return;
        }
        match result {
            Ok(items) => {
                debug!(count = items.len(), "updates loaded");
                self.updates.set(items);
            }
            Err(err) => {
                warn!(error = %err, "failed to fetch updates");
                self.error.set(Some(err.to_string()));
            }
        }
    }

    /// Fetch the recommendations. On failure the current list is kept.
    pub async fn load_recommendations(&self) {
        let ticket = self.recommendations_seq.issue();
        let _pending = Pending::start(self.pending);
        self.error.set(None);

        let result = self.service.fetch_recommendations().await;
        if !self.recommendations_seq.is_current(ticket) {
            return;
        }
        match result {
            Ok(items) => self.recommendations.set(items),
            Err(err) => {
                warn!(error = %err, "failed to fetch recommendations");
                self.error.set(Some(err.to_string()));
            }
        }
    }

    /// Send reader feedback. The error is recorded and also returned so the
    /// form can keep its input.
    pub async fn submit_feedback(&self, feedback: &Feedback) -> Result<(), DocError> {
        let _pending = Pending::start(self.pending);
        self.error.set(None);

        match self.service.submit_feedback(feedback).await {
            Ok(()) => {
                info!(kind = feedback.kind.as_str(), "feedback submitted");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "failed to submit feedback");
                self.error.set(Some(err.to_string()));
                Err(err)
            }
        }
    }

    /// Record that the reader has seen the release notes as of now.
    pub fn mark_updates_viewed(&self) {
        self.mark_updates_viewed_at(Utc::now());
    }

    pub fn mark_updates_viewed_at(&self, at: DateTime<Utc>) {
        self.last_viewed.set(Some(at));
        let raw = at.to_rfc3339_opts(SecondsFormat::Millis, true);
        if let Err(err) = self.storage.set(storage_keys::LAST_VIEWED_UPDATE, &raw) {
            warn!(key = storage_keys::LAST_VIEWED_UPDATE, error = %err, "failed to persist last viewed time");
        }
    }
}

fn restore_last_viewed<K: KeyValueStore + ?Sized>(storage: &K) -> Option<DateTime<Utc>> {
    let raw = storage.get(storage_keys::LAST_VIEWED_UPDATE)?;
    match DateTime::parse_from_rfc3339(&raw) {
        Ok(at) => Some(at.with_timezone(&Utc)),
        Err(err) => {
            warn!(key = storage_keys::LAST_VIEWED_UPDATE, error = %err, "ignoring malformed entry");
            None
        }
    }
}
