//! Collapsible "What's new" board: release notes, recommendations and a
//! feedback form.

use chrono::Utc;
use leptos::{ev, prelude::*};
use leptos_icons::Icon;
use wasm_bindgen_futures::spawn_local;

use crate::app::AppContext;
use crate::components::icons as ic;
use crate::models::{Feedback, FeedbackKind, RecommendationItem, UpdateItem};
use crate::utils::format::format_date;

stylance::import_crate_style!(css, "src/components/announcements/announcements.module.css");

#[component]
pub fn AnnouncementPanel() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let board = ctx.announcements.clone();

    let open = RwSignal::new(false);
    let has_new = board.has_new_updates();
    let updates = board.updates();
    let recommendations = board.recommendations();
    let loading = board.loading();
    let error = board.error();

    // Opening the board counts as seeing the release notes.
    let on_toggle = move |_| {
        let now_open = !open.get_untracked();
        open.set(now_open);
        if now_open {
            board.mark_updates_viewed();
        }
    };

    view! {
        <section class=css::panel>
            <button
                class=css::header
                aria-expanded=move || open.get().to_string()
                on:click=on_toggle
            >
                <Icon icon=ic::ANNOUNCEMENTS />
                <span class=css::title>"What's new"</span>
                <Show when=move || has_new.get()>
                    <span class=css::badge title="New updates"><Icon icon=ic::NEW_UPDATES /></span>
                </Show>
            </button>

            <Show when=move || open.get()>
                <div class=css::body>
                    <Show when=move || loading.get()>
                        <div class=css::status>"Loading..."</div>
                    </Show>
                    {move || error.get().map(|msg| view! {
                        <div class=css::error role="alert">{msg}</div>
                    })}

                    <ul class=css::list>
                        <For
                            each=move || updates.get()
                            key=|item| item.id.clone()
                            children=|item| view! { <UpdateEntry item=item /> }
                        />
                    </ul>

                    <Show when=move || !recommendations.with(Vec::is_empty)>
                        <h3 class=css::heading>"Recommended"</h3>
                        <ul class=css::list>
                            <For
                                each=move || recommendations.get()
                                key=|item| item.id.clone()
                                children=|item| view! { <RecommendationEntry item=item /> }
                            />
                        </ul>
                    </Show>

                    <FeedbackForm />
                </div>
            </Show>
        </section>
    }
}

#[component]
fn UpdateEntry(item: UpdateItem) -> impl IntoView {
    let class = if item.important {
        format!("{} {}", css::entry, css::important)
    } else {
        css::entry.to_string()
    };
    let date = format_date(&item.date).to_string();

    view! {
        <li class=class>
            <span class=css::entryTitle>{item.title}</span>
            <span class=css::entryMeta>{date}</span>
            <p class=css::entryText>{item.description}</p>
            {(!item.changes.is_empty()).then(|| view! {
                <ul class=css::changes>
                    {item.changes.into_iter().map(|change| view! { <li>{change}</li> }).collect_view()}
                </ul>
            })}
        </li>
    }
}

#[component]
fn RecommendationEntry(item: RecommendationItem) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let selected = ctx.selected;

    let meta = if item.tags.is_empty() {
        item.category.clone()
    } else {
        format!("{} · {}", item.category, item.tags.join(", "))
    };
    let title = match (item.path, item.url) {
        (Some(path), _) => view! {
            <button class=css::link on:click=move |_| selected.set(Some(path.clone()))>
                {item.title}
            </button>
        }
        .into_any(),
        (None, Some(url)) => view! {
            <a class=css::link href=url target="_blank" rel="noopener noreferrer">{item.title}</a>
        }
        .into_any(),
        (None, None) => view! { <span class=css::entryTitle>{item.title}</span> }.into_any(),
    };

    view! {
        <li class=css::entry>
            {title}
            <span class=css::entryMeta>{meta}</span>
            <p class=css::entryText>{item.description}</p>
        </li>
    }
}

#[component]
fn FeedbackForm() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let board = ctx.announcements.clone();

    let kind = RwSignal::new(FeedbackKind::default());
    let content = RwSignal::new(String::new());
    let contact = RwSignal::new(String::new());
    let sending = RwSignal::new(false);
    let sent = RwSignal::new(false);

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let text = content.get_untracked();
        if text.trim().is_empty() || sending.get_untracked() {
            return;
        }
        let feedback = Feedback::new(kind.get_untracked(), text, Utc::now())
            .with_contact(contact.get_untracked());
        let board = board.clone();
        sending.set(true);
        sent.set(false);
        spawn_local(async move {
            // Failures are shown through the board's error banner.
            if board.submit_feedback(&feedback).await.is_ok() {
                content.set(String::new());
                sent.set(true);
            }
            sending.set(false);
        });
    };

    view! {
        <form class=css::feedback on:submit=on_submit>
            <h3 class=css::heading>"Feedback"</h3>
            <select
                class=css::field
                aria-label="Feedback type"
                on:change=move |ev| {
                    if let Some(parsed) = FeedbackKind::parse(&event_target_value(&ev)) {
                        kind.set(parsed);
                    }
                }
            >
                {FeedbackKind::ALL
                    .into_iter()
                    .map(|k| view! {
                        <option value=k.as_str() selected=move || kind.get() == k>{k.label()}</option>
                    })
                    .collect_view()}
            </select>
            <textarea
                class=css::field
                rows="3"
                placeholder="What should we know?"
                prop:value=move || content.get()
                on:input=move |ev| content.set(event_target_value(&ev))
            />
            <input
                class=css::field
                type="text"
                placeholder="Contact (optional)"
                prop:value=move || contact.get()
                on:input=move |ev| contact.set(event_target_value(&ev))
            />
            <button
                class=css::send
                type="submit"
                disabled=move || sending.get() || content.with(|c| c.trim().is_empty())
            >
                <Icon icon=ic::SEND />
                "Send"
            </button>
            <Show when=move || sent.get()>
                <div class=css::status>"Thanks for the feedback."</div>
            </Show>
        </form>
    }
}
