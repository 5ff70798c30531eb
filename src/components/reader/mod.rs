//! Reader pane for the selected document.
//!
//! Content is shown as preformatted text. The pane applies the persisted
//! display settings, remembers the scroll position per document and
//! restores it when that document is opened again.

use leptos::{ev, prelude::*};
use leptos_icons::Icon;
use wasm_bindgen_futures::spawn_local;

use crate::app::AppContext;
use crate::components::icons as ic;
use crate::models::{DocContent, DocKind, ReaderTheme, ReadingSettingsPatch};
use crate::utils::format::{format_date, format_size};

stylance::import_crate_style!(css, "src/components/reader/reader.module.css");

const MIN_FONT_SIZE: u32 = 12;
const MAX_FONT_SIZE: u32 = 28;

fn next_theme(theme: ReaderTheme) -> ReaderTheme {
    match theme {
        ReaderTheme::Light => ReaderTheme::Sepia,
        ReaderTheme::Sepia => ReaderTheme::Dark,
        ReaderTheme::Dark => ReaderTheme::Light,
    }
}

fn theme_class(theme: ReaderTheme) -> &'static str {
    match theme {
        ReaderTheme::Light => css::light,
        ReaderTheme::Dark => css::dark,
        ReaderTheme::Sepia => css::sepia,
    }
}

#[component]
pub fn Reader() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let docs = ctx.docs.clone();
    let reading = ctx.reading.clone();
    let selected = ctx.selected;

    let current_doc = docs.current_doc();
    let breadcrumb = docs.breadcrumb();
    let content_loading = docs.content_loading();
    let error = docs.error();
    let session = reading.session();

    let container_ref = NodeRef::<leptos::html::Div>::new();

    // Load content when the selection changes
    Effect::new({
        let docs = docs.clone();
        move |_| {
            if let Some(path) = selected.get() {
                let docs = docs.clone();
                spawn_local(async move { docs.load_content(&path).await });
            }
        }
    });

    // Return to the saved position when its document is shown again
    Effect::new(move |_| {
        let Some(path) = current_doc.with(|doc| doc.as_ref().map(|d| d.path.clone())) else {
            return;
        };
        let offset = session.with_untracked(|s| {
            s.last_position
                .as_ref()
                .filter(|p| p.path == path)
                .map(|p| p.scroll)
        });
        if let (Some(offset), Some(el)) = (offset, container_ref.get_untracked()) {
            el.set_scroll_top(offset as i32);
        }
    });

    let on_scroll = {
        let reading = reading.clone();
        move |_: ev::Event| {
            if let (Some(el), Some(path)) = (container_ref.get_untracked(), selected.get_untracked()) {
                reading.save_position(&path, f64::from(el.scroll_top()));
            }
        }
    };

    let on_keydown = {
        let reading = reading.clone();
        move |ev: ev::KeyboardEvent| {
            if ev.key() == "Escape" && session.with_untracked(|s| s.is_immersive) {
                ev.prevent_default();
                reading.set_immersive(false);
            }
        }
    };

    let change_font = {
        let reading = reading.clone();
        move |delta: i32| {
            let size = session.with_untracked(|s| s.settings.font_size);
            let size = size
                .saturating_add_signed(delta)
                .clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
            reading.update_settings(ReadingSettingsPatch {
                font_size: Some(size),
                ..Default::default()
            });
        }
    };
    let font_down = change_font.clone();
    let font_up = change_font;

    let cycle_theme = {
        let reading = reading.clone();
        move |_| {
            let theme = session.with_untracked(|s| s.settings.theme);
            reading.update_settings(ReadingSettingsPatch {
                theme: Some(next_theme(theme)),
                ..Default::default()
            });
        }
    };

    let toggle_immersive = {
        let reading = reading.clone();
        move |_| reading.toggle_immersive()
    };

    let reading_time = {
        let reading = reading.clone();
        move || {
            session.track();
            selected
                .get()
                .map(|path| reading.formatted_reading_time(&path))
        }
    };

    let pane_class = move || {
        let theme = session.with(|s| s.settings.theme);
        format!("{} {}", css::reader, theme_class(theme))
    };

    let content_style = move || {
        session.with(|s| {
            let st = &s.settings;
            format!(
                "max-width: {}%; font-size: {}px; line-height: {}; padding: 0 {}rem; --paragraph-spacing: {}em;",
                st.content_width, st.font_size, st.line_height, st.margin_size, st.paragraph_spacing
            )
        })
    };

    view! {
        <div
            class=pane_class
            node_ref=container_ref
            tabindex="0"
            on:scroll=on_scroll
            on:keydown=on_keydown
        >
            <div class=css::toolbar>
                <nav class=css::breadcrumb aria-label="Breadcrumb">
                    {move || breadcrumb.get().into_iter().enumerate().map(|(i, item)| view! {
                        {(i > 0).then(|| view! { <span class=css::separator>"/"</span> })}
                        <span class=css::crumb title=item.path>{item.name}</span>
                    }).collect_view()}
                </nav>
                <div class=css::controls>
                    {move || reading_time().map(|time| view! {
                        <span class=css::readingTime title="Time spent reading">
                            <Icon icon=ic::CLOCK />
                            {time}
                        </span>
                    })}
                    <button class=css::control aria-label="Smaller text" on:click=move |_| font_down(-1)>
                        <Icon icon=ic::FONT_DECREASE />
                    </button>
                    <button class=css::control aria-label="Larger text" on:click=move |_| font_up(1)>
                        <Icon icon=ic::FONT_INCREASE />
                    </button>
                    <button class=css::control aria-label="Change theme" on:click=cycle_theme>
                        {move || format!("{:?}", session.with(|s| s.settings.theme))}
                    </button>
                    <button class=css::control aria-label="Immersive mode" on:click=toggle_immersive>
                        <Icon icon=ic::IMMERSIVE />
                    </button>
                </div>
            </div>

            {move || error.get().map(|msg| view! {
                <div class=css::error role="alert">{msg}</div>
            })}

            <Show when=move || content_loading.get()>
                <div class=css::status>"Loading..."</div>
            </Show>

            <article class=css::article style=content_style>
                {move || match current_doc.get() {
                    Some(doc) => view! { <Document doc=doc /> }.into_any(),
                    None if selected.with(Option::is_none) => view! { <RecentList /> }.into_any(),
                    None => ().into_any(),
                }}
            </article>
        </div>
    }
}

#[component]
fn Document(doc: DocContent) -> impl IntoView {
    let title = doc.display_name().to_string();
    let mut meta = vec![format_size(doc.size)];
    if !doc.last_modified.is_empty() {
        meta.push(format_date(&doc.last_modified).to_string());
    }
    if let Some(minutes) = doc.estimated_reading_time {
        meta.push(format!("~{} min read", minutes));
    }
    if let Some(pages) = doc.page_count {
        meta.push(format!("{} pages", pages));
    }

    let body = match (doc.content, doc.kind) {
        (Some(text), _) => view! { <pre class=css::content>{text}</pre> }.into_any(),
        (None, Some(DocKind::Pdf)) => view! {
            <p class=css::status>"This PDF has no extracted text."</p>
        }
        .into_any(),
        (None, _) => view! { <p class=css::status>"This document is empty."</p> }.into_any(),
    };

    view! {
        <header class=css::docHeader>
            <h1 class=css::title>{title}</h1>
            <p class=css::meta>{meta.join(" · ")}</p>
        </header>
        {body}
    }
}

#[component]
fn RecentList() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let recent = ctx.docs.recent();
    let selected = ctx.selected;

    view! {
        <section class=css::recent>
            <h2 class=css::recentTitle>"Recently updated"</h2>
            <Show
                when=move || !recent.with(Vec::is_empty)
                fallback=|| view! { <p class=css::status>"Select a document to start reading."</p> }
            >
                <ul class=css::recentList>
                    <For
                        each=move || recent.get()
                        key=|doc| doc.path.clone()
                        children=move |doc| {
                            let path = doc.path.clone();
                            let name = if doc.name.is_empty() { doc.path.clone() } else { doc.name.clone() };
                            view! {
                                <li>
                                    <button class=css::recentItem on:click=move |_| selected.set(Some(path.clone()))>
                                        <Icon icon=ic::FILE_TEXT />
                                        <span>{name}</span>
                                        <span class=css::meta>{format_date(&doc.last_modified).to_string()}</span>
                                    </button>
                                </li>
                            }
                        }
                    />
                </ul>
            </Show>
        </section>
    }
}
