//! Page layout.

use leptos::prelude::*;

use crate::app::AppContext;
use crate::components::announcements::AnnouncementPanel;
use crate::components::reader::Reader;
use crate::components::search::SearchPanel;
use crate::components::tree::DocTreeView;
use crate::config::APP_NAME;

stylance::import_crate_style!(css, "src/components/shell/shell.module.css");

/// Sidebar (announcements, search and tree) next to the reader. The sidebar is hidden in
/// immersive mode.
#[component]
pub fn Shell() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let session = ctx.reading.session();
    let immersive = Signal::derive(move || session.with(|s| s.is_immersive));

    view! {
        <div class=css::shell>
            <Show when=move || !immersive.get()>
                <aside class=css::sidebar>
                    <header class=css::brand>{APP_NAME}</header>
                    <AnnouncementPanel />
                    <SearchPanel />
                    <DocTreeView />
                </aside>
            </Show>
            <main class=css::main>
                <Reader />
            </main>
        </div>
    }
}
