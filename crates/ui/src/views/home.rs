use dioxus::prelude::*;
use dioxus_router::Link;

use crate::auth::use_auth;
use crate::routes::Route;
use crate::vm::{TopicCardVm, featured_topics};

#[component]
pub fn HomeView() -> Element {
    let auth = use_auth();
    let featured = use_hook(featured_topics);

    rsx! {
        div { class: "page home",
            header { class: "hero",
                h1 { "Welcome to LLM Learning Bot" }
                p { class: "lead",
                    "Master the fundamentals of Large Language Models through interactive quizzes and hands-on learning."
                }
                if let Some(user) = auth.user() {
                    p { class: "welcome", "Welcome back, {user.display_name()}" }
                    Link { class: "button", to: Route::Topics {}, "Browse Topics" }
                } else {
                    div { class: "cta",
                        Link { class: "button", to: Route::Register {}, "Get Started" }
                        Link { class: "button secondary", to: Route::Login {}, "Sign In" }
                    }
                }
            }

            section { class: "featured",
                h2 { "Featured Topics" }
                div { class: "topic-grid",
                    for topic in featured {
                        FeaturedTopic { key: "{topic.id}", topic }
                    }
                }
            }
        }
    }
}

#[component]
fn FeaturedTopic(topic: TopicCardVm) -> Element {
    rsx! {
        article { class: "topic-card",
            h3 { "{topic.name}" }
            p { "{topic.description}" }
            span { class: "badge", "{topic.difficulty_label}" }
            Link { class: "button", to: Route::Quiz { topic_id: topic.id }, "Start Quiz" }
        }
    }
}
