use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::shared::ErrorPanel;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{TopicCardVm, map_topic_cards};

#[component]
pub fn TopicsView() -> Element {
    let ctx = use_context::<AppContext>();
    let topics = ctx.topics();
    let refresh = use_signal(|| false);

    let resource = use_resource(move || {
        let topics = topics.clone();
        let force = refresh();
        async move {
            let items = if force {
                topics.refresh().await
            } else {
                topics.list_topics().await
            }
            .map_err(ViewError::from)?;
            Ok::<_, ViewError>(map_topic_cards(&items))
        }
    });

    let state = view_state_from_resource(&resource);
    let on_retry = move |()| {
        let mut refresh = refresh;
        let mut resource = resource;
        if refresh() {
            resource.restart();
        } else {
            refresh.set(true);
        }
    };

    rsx! {
        div { class: "page topics",
            h1 { "Available Topics" }
            p { class: "lead", "Choose a topic to start learning about LLM concepts" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { class: "loading", "Loading..." }
                },
                ViewState::Ready(cards) => rsx! {
                    if cards.is_empty() {
                        p { "No topics available yet." }
                    } else {
                        div { class: "topic-grid",
                            for card in cards {
                                TopicCard { key: "{card.id}", card }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    h2 { class: "error", "Error loading topics" }
                    ErrorPanel { error: err, on_retry }
                },
            }
        }
    }
}

#[component]
fn TopicCard(card: TopicCardVm) -> Element {
    rsx! {
        article { class: "topic-card",
            h3 { "{card.name}" }
            p { "{card.description}" }
            span { class: "badge", "{card.difficulty_label}" }
            Link { class: "button", to: Route::Quiz { topic_id: card.id }, "Start Quiz" }
        }
    }
}
