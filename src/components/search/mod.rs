//! Search box with suggestions, results and pagination.

use leptos::{ev, prelude::*};
use leptos_icons::Icon;
use wasm_bindgen_futures::spawn_local;

use crate::app::AppContext;
use crate::components::icons as ic;
use crate::config::search::DEFAULT_SUGGESTION_LIMIT;
use crate::models::{SearchParams, SearchResult};
use crate::utils::format::format_date;

stylance::import_crate_style!(css, "src/components/search/search.module.css");

#[component]
pub fn SearchPanel() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let search = ctx.search.clone();

    let query = RwSignal::new(String::new());
    let result_set = search.result_set();
    let loading = search.loading();
    let error = search.error();
    let suggestions = search.suggestions();
    let suggest_error = search.suggest_error();

    let run_search = {
        let search = search.clone();
        move |q: String| {
            let search = search.clone();
            spawn_local(async move {
                search.search(SearchParams::new(q)).await;
            });
        }
    };

    let on_input = {
        let search = search.clone();
        move |ev: ev::Event| {
            let value = event_target_value(&ev);
            query.set(value.clone());
            let search = search.clone();
            spawn_local(async move {
                search.suggest(&value, DEFAULT_SUGGESTION_LIMIT).await;
            });
        }
    };

    let on_submit = {
        let run_search = run_search.clone();
        move |ev: ev::SubmitEvent| {
            ev.prevent_default();
            run_search(query.get_untracked());
        }
    };

    let on_clear = {
        let search = search.clone();
        move |_| {
            query.set(String::new());
            search.reset();
        }
    };

    let page_nav = {
        let search = search.clone();
        move |forward: bool| {
            let search = search.clone();
            spawn_local(async move {
                if forward {
                    search.next_page().await;
                } else {
                    search.prev_page().await;
                }
            });
        }
    };
    let prev = page_nav.clone();
    let next = page_nav;

    let meta = Signal::derive(move || result_set.with(|set| set.meta));
    let has_results = Signal::derive(move || result_set.with(|set| !set.is_empty()));

    view! {
        <section class=css::panel>
            <form class=css::form role="search" on:submit=on_submit>
                <span class=css::icon><Icon icon=ic::SEARCH /></span>
                <input
                    class=css::input
                    type="search"
                    placeholder="Search documents"
                    aria-label="Search documents"
                    title=move || {
                        suggest_error
                            .get()
                            .map(|msg| format!("Suggestions unavailable: {}", msg))
                            .unwrap_or_default()
                    }
                    prop:value=move || query.get()
                    on:input=on_input
                />
                <Show when=move || !query.get().is_empty()>
                    <button type="button" class=css::clear aria-label="Clear search" on:click=on_clear.clone()>
                        <Icon icon=ic::CLOSE />
                    </button>
                </Show>
            </form>

            <Show when=move || !suggestions.with(Vec::is_empty) && !has_results.get()>
                <ul class=css::suggestions>
                    {
                        let run_search = run_search.clone();
                        move || {
                            let run_search = run_search.clone();
                            suggestions.get().into_iter().map(move |text| {
                                let run_search = run_search.clone();
                                let label = text.clone();
                                view! {
                                    <li>
                                        <button
                                            class=css::suggestion
                                            on:click=move |_| {
                                                query.set(text.clone());
                                                run_search(text.clone());
                                            }
                                        >
                                            {label}
                                        </button>
                                    </li>
                                }
                            }).collect_view()
                        }
                    }
                </ul>
            </Show>

            <Show when=move || loading.get()>
                <div class=css::status>"Searching..."</div>
            </Show>
            {move || error.get().map(|msg| view! {
                <div class=css::error role="alert">{msg}</div>
            })}

            <Show when=move || has_results.get()>
                <ol class=css::results>
                    <For
                        each=move || result_set.with(|set| set.results.clone())
                        key=|result| result.path.clone()
                        children=move |result| view! { <ResultItem result=result /> }
                    />
                </ol>
                <nav class=css::pager aria-label="Search pages">
                    <button
                        class=css::pageButton
                        aria-label="Previous page"
                        disabled=move || !meta.get().has_prev()
                        on:click={
                            let prev = prev.clone();
                            move |_| prev(false)
                        }
                    >
                        <Icon icon=ic::CHEVRON_LEFT />
                    </button>
                    <span class=css::pageInfo>
                        {move || {
                            let m = meta.get();
                            format!("Page {} of {} · {} results", m.page, m.total_pages.max(1), m.total)
                        }}
                    </span>
                    <button
                        class=css::pageButton
                        aria-label="Next page"
                        disabled=move || !meta.get().has_next()
                        on:click={
                            let next = next.clone();
                            move |_| next(true)
                        }
                    >
                        <Icon icon=ic::CHEVRON_RIGHT />
                    </button>
                </nav>
            </Show>
        </section>
    }
}

#[component]
fn ResultItem(result: SearchResult) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let selected = ctx.selected;

    let path = result.path.clone();
    let snippet = result.matches.first().map(|m| m.text.clone());
    let modified = format_date(&result.last_modified).to_string();
    let extra = result.matches.len().saturating_sub(1);

    view! {
        <li class=css::result>
            <button class=css::resultButton on:click=move |_| selected.set(Some(path.clone()))>
                <span class=css::resultName>{result.name}</span>
                <span class=css::resultPath>{result.path}</span>
                {snippet.map(|text| view! { <span class=css::snippet>{text}</span> })}
                <span class=css::resultMeta>
                    {modified}
                    {(extra > 0).then(|| format!(" · {} more matches", extra))}
                </span>
            </button>
        </li>
    }
}
