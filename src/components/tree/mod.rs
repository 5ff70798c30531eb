//! Document tree with lazily loaded directories.
//!
//! Rows read their children from the store by path, so a merge anywhere in
//! the tree updates only the rows under the merged directory. Which
//! directories are open is view state and lives here, not in the store.

use std::collections::HashSet;

use icondata::Icon as IconData;
use leptos::prelude::*;
use leptos_icons::Icon;
use wasm_bindgen_futures::spawn_local;

use crate::app::AppContext;
use crate::components::icons as ic;
use crate::models::DocNode;

stylance::import_crate_style!(css, "src/components/tree/tree.module.css");

/// Paths of the directories currently shown open.
#[derive(Clone, Copy)]
struct OpenDirs(RwSignal<HashSet<String>>);

fn file_icon(node: &DocNode) -> IconData {
    if node.name.to_ascii_lowercase().ends_with(".pdf") {
        ic::FILE_PDF
    } else {
        ic::FILE_TEXT
    }
}

fn indent(depth: usize) -> String {
    format!("padding-left: {:.2}rem", 0.5 + depth as f32 * 0.9)
}

#[component]
pub fn DocTreeView() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    provide_context(OpenDirs(RwSignal::new(HashSet::new())));

    let tree = ctx.docs.tree();
    let tree_loading = ctx.docs.tree_loading();
    let error = ctx.docs.error();

    let top_level = Signal::derive(move || {
        tree.with(|t| {
            t.as_ref()
                .map(|t| t.root().children.clone())
                .unwrap_or_default()
        })
    });

    view! {
        <nav class=css::tree aria-label="Documents">
            <Show when=move || tree_loading.get()>
                <div class=css::status>"Loading documents..."</div>
            </Show>
            {move || error.get().map(|msg| view! {
                <div class=css::error role="alert">{msg}</div>
            })}
            <For
                each=move || top_level.get()
                key=|node| node.path_str().to_string()
                children=move |node| view! { <TreeRow node=node depth=0 /> }
            />
        </nav>
    }
}

#[component]
fn TreeRow(node: DocNode, depth: usize) -> AnyView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let open_dirs = use_context::<OpenDirs>().expect("OpenDirs must be provided");
    let path = node.path_str().to_string();

    if !node.is_directory {
        let selected = ctx.selected;
        let is_selected = {
            let path = path.clone();
            Signal::derive(move || selected.with(|s| s.as_deref() == Some(path.as_str())))
        };
        let row_class = move || {
            if is_selected.get() {
                format!("{} {}", css::row, css::selected)
            } else {
                css::row.to_string()
            }
        };
        let icon = file_icon(&node);
        let title = path.clone();
        return view! {
            <button
                class=row_class
                style=indent(depth)
                title=title
                on:click=move |_| selected.set(Some(path.clone()))
            >
                <Icon icon=icon />
                <span class=css::name>{node.name}</span>
            </button>
        }
        .into_any();
    }

    let docs = ctx.docs.clone();
    let tree = docs.tree();
    let loading_paths = docs.loading_paths();

    let is_open = {
        let path = path.clone();
        Signal::derive(move || open_dirs.0.with(|set| set.contains(&path)))
    };
    let is_loading = {
        let path = path.clone();
        Signal::derive(move || loading_paths.with(|m| m.contains_key(&path)))
    };
    let children = {
        let path = path.clone();
        Signal::derive(move || {
            tree.with(|t| {
                t.as_ref()
                    .and_then(|t| t.find(&path))
                    .map(|n| n.children.clone())
                    .unwrap_or_default()
            })
        })
    };

    let toggle = move |_| {
        let opening = !is_open.get_untracked();
        open_dirs.0.update(|set| {
            if opening {
                set.insert(path.clone());
            } else {
                set.remove(&path);
            }
        });
        let needs_fetch = tree.with_untracked(|t| {
            t.as_ref()
                .and_then(|t| t.find(&path))
                .is_some_and(DocNode::needs_fetch)
        });
        if opening && needs_fetch {
            let docs = docs.clone();
            let path = path.clone();
            spawn_local(async move {
                docs.expand_node(&path).await;
            });
        }
    };

    view! {
        <div class=css::branch>
            <button
                class=css::row
                style=indent(depth)
                aria-expanded=move || is_open.get().to_string()
                on:click=toggle
            >
                <span class=css::chevron>
                    {move || if is_open.get() {
                        view! { <Icon icon=ic::CHEVRON_DOWN /> }
                    } else {
                        view! { <Icon icon=ic::CHEVRON_RIGHT /> }
                    }}
                </span>
                {move || if is_open.get() {
                    view! { <Icon icon=ic::FOLDER_OPEN /> }
                } else {
                    view! { <Icon icon=ic::FOLDER /> }
                }}
                <span class=css::name>{node.name}</span>
                <Show when=move || is_loading.get()>
                    <span class=css::spinner aria-label="Loading"></span>
                </Show>
            </button>
            <Show when=move || is_open.get()>
                <For
                    each=move || children.get()
                    key=|child| child.path_str().to_string()
                    children=move |child| view! { <TreeRow node=child depth={depth + 1} /> }
                />
            </Show>
        </div>
    }
    .into_any()
}
