//! Root application module.
//!
//! Contains the main App component and the AppContext handed to every
//! component.

use std::sync::Arc;

use gloo_timers::callback::Interval;
use leptos::prelude::*;
use tracing::{info, warn};
use wasm_bindgen_futures::spawn_local;

use crate::components::Shell;
use crate::config::{APP_NAME, READING_TICK_SECS};
use crate::core::{
    AnnouncementStore, BrowserStorage, DocStore, HttpDocService, KeyValueStore, MemoryStorage,
    ReadingStore, SearchStore,
};

/// Storage backing the reading session and the announcement board.
pub type SessionStorage = dyn KeyValueStore + Send + Sync;

// ============================================================================
// AppContext
// ============================================================================

/// Application-wide reactive context.
///
/// Provided at the root of the component tree; any child can reach it with
/// `use_context::<AppContext>()`. Cloning is cheap: stores only hold signals
/// and shared handles.
#[derive(Clone)]
pub struct AppContext {
    /// Document tree, open document and recent documents.
    pub docs: DocStore<HttpDocService>,

    /// Search results and suggestions.
    pub search: SearchStore<HttpDocService>,

    /// Immersive mode, reader settings and reading time.
    pub reading: ReadingStore<SessionStorage>,

    /// Release notes, recommendations and feedback.
    pub announcements: AnnouncementStore<HttpDocService, SessionStorage>,

    /// Path of the document shown in the reader.
    pub selected: RwSignal<Option<String>>,
}

impl AppContext {
    /// Creates the context with the HTTP service and the restored session.
    ///
    /// Falls back to in-memory storage when localStorage is unavailable, in
    /// which case the session lasts only as long as the page.
    pub fn new() -> Self {
        let service = Arc::new(HttpDocService::default());
        let storage: Arc<SessionStorage> = if BrowserStorage::is_available() {
            Arc::new(BrowserStorage)
        } else {
            warn!("localStorage unavailable, reading session will not persist");
            Arc::new(MemoryStorage::new())
        };
        let reading = ReadingStore::restored(Arc::clone(&storage));
        let selected = reading
            .session()
            .with_untracked(|s| s.last_position.as_ref().map(|p| p.path.clone()));

        Self {
            docs: DocStore::new(Arc::clone(&service)),
            search: SearchStore::new(Arc::clone(&service)),
            reading,
            announcements: AnnouncementStore::new(service, storage),
            selected: RwSignal::new(selected),
        }
    }

    /// Add one reading tick to the open document.
    fn tick_reading_time(&self) {
        if let Some(path) = self.selected.get_untracked() {
            self.reading
                .accumulate_reading_time(&path, u64::from(READING_TICK_SECS));
        }
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Root application component with error boundary.
///
/// This component:
/// - Creates and provides the global AppContext
/// - Loads the document tree, recent documents and announcements
/// - Starts the reading-time ticker
/// - Renders the Shell inside an ErrorBoundary
#[component]
pub fn App() -> impl IntoView {
    let ctx = AppContext::new();
    provide_context(ctx.clone());

    info!(app = APP_NAME, "starting");
    let docs = ctx.docs.clone();
    spawn_local(async move { docs.init().await });
    let announcements = ctx.announcements.clone();
    spawn_local(async move { announcements.init().await });

    let ticker = ctx.clone();
    Interval::new(READING_TICK_SECS * 1000, move || ticker.tick_reading_time()).forget();

    view! {
        <ErrorBoundary
            fallback=|errors| view! {
                <div style="
                    display: flex;
                    flex-direction: column;
                    align-items: center;
                    justify-content: center;
                    height: 100vh;
                    padding: 2rem;
                    font-family: system-ui, sans-serif;
                ">
                    <h1 style="color: #c0392b; margin-bottom: 1rem;">
                        "Something went wrong"
                    </h1>
                    <ul style="color: #c0392b; font-size: 0.9rem;">
                        {move || errors.get()
                            .into_iter()
                            .map(|(_, e)| view! { <li>{e.to_string()}</li> })
                            .collect::<Vec<_>>()
                        }
                    </ul>
                    <button
                        on:click=move |_| {
                            if let Some(window) = web_sys::window() {
                                let _ = window.location().reload();
                            }
                        }
                    >
                        "Reload Page"
                    </button>
                </div>
            }
        >
            <Shell />
        </ErrorBoundary>
    }
}
