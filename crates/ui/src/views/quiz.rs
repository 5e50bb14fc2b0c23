use std::sync::Arc;

use dioxus::core::spawn_forever;
use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use quiz_core::model::TopicId;
use services::{Progress, QuizSession, QuizSessionController};

use crate::auth::use_auth;
use crate::context::AppContext;
use crate::routes::Route;
use crate::views::shared::{ErrorPanel, SignInPrompt};
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{QuestionVm, ResultVm, map_question, map_result};

#[component]
pub fn QuizView(topic_id: u64) -> Element {
    let auth = use_auth();

    if auth.is_validating() {
        return rsx! {
            div { class: "page quiz",
                p { class: "loading", "Checking session..." }
            }
        };
    }
    if !auth.is_authenticated() {
        return rsx! {
            div { class: "page quiz",
                SignInPrompt { message: "Sign in to take a quiz and track your progress." }
            }
        };
    }

    rsx! {
        QuizRunner { key: "{topic_id}", topic_id }
    }
}

#[derive(Clone, Copy)]
struct QuizSignals {
    session: Signal<Option<QuizSession>>,
    action_error: Signal<Option<ViewError>>,
    results_error: Signal<Option<ViewError>>,
    results_loading: Signal<bool>,
}

/// Fetch the topic aggregate into the session.
///
/// Runs detached from the view; every write is skipped once the view is gone.
async fn load_results(quiz: Arc<QuizSessionController>, signals: QuizSignals) {
    let QuizSignals {
        mut session,
        mut results_error,
        mut results_loading,
        ..
    } = signals;
    let topic_id = match session.try_peek() {
        Ok(guard) => guard.as_ref().map(QuizSession::topic_id),
        Err(_) => None,
    };
    let Some(topic_id) = topic_id else {
        return;
    };

    if let Ok(mut loading) = results_loading.try_write() {
        *loading = true;
    }
    let loaded = quiz.load_results(topic_id).await;
    if let Ok(mut loading) = results_loading.try_write() {
        *loading = false;
    }

    let failure = match loaded {
        Ok(result) => {
            if let Ok(mut guard) = session.try_write()
                && let Some(current) = guard.as_mut()
            {
                current.record_result(result);
            }
            None
        }
        Err(err) => Some(ViewError::from_load(&err)),
    };
    if let Ok(mut slot) = results_error.try_write() {
        *slot = failure;
    }
}

#[component]
fn QuizRunner(topic_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let quiz = ctx.quiz();
    let navigator = use_navigator();

    let signals = QuizSignals {
        session: use_signal(|| None::<QuizSession>),
        action_error: use_signal(|| None::<ViewError>),
        results_error: use_signal(|| None::<ViewError>),
        results_loading: use_signal(|| false),
    };

    let resource = {
        let quiz = quiz.clone();
        use_resource(move || {
            let quiz = quiz.clone();
            let mut session = signals.session;
            async move {
                let started = quiz
                    .start_session(TopicId::new(topic_id), quiz.question_count())
                    .await
                    .map_err(ViewError::from)?;
                session.set(Some(started));
                Ok::<_, ViewError>(())
            }
        })
    };

    let on_select = {
        let quiz = quiz.clone();
        use_callback(move |option: String| {
            let mut session = signals.session;
            let mut action_error = signals.action_error;
            let submission = {
                let mut guard = session.write();
                let Some(current) = guard.as_mut() else {
                    return;
                };
                match quiz.prepare_answer(current, &option) {
                    Ok(submission) => submission,
                    Err(err) => {
                        tracing::debug!(error = %err, "selection ignored");
                        return;
                    }
                }
            };
            action_error.set(None);

            let quiz = quiz.clone();
            // The request finishes even if the view is left; its verdict is then dropped.
            spawn_forever(async move {
                let question_id = submission.question_id;
                let outcome = quiz.submit(&submission).await;
                let (failure, graded_last) = {
                    let Ok(mut guard) = session.try_write() else {
                        tracing::debug!(%question_id, "answer verdict discarded");
                        return;
                    };
                    match (guard.as_mut(), outcome) {
                        (Some(current), Ok(feedback)) => {
                            let applied = current.finish_answer(question_id, feedback);
                            (None, applied && current.is_last())
                        }
                        (Some(current), Err(err)) => {
                            current.abandon_answer(question_id);
                            (Some(ViewError::from_submit(&err)), false)
                        }
                        (None, _) => (None, false),
                    }
                };
                if let Ok(mut slot) = action_error.try_write() {
                    *slot = failure;
                }
                if graded_last {
                    load_results(quiz, signals).await;
                }
            });
        })
    };

    let on_next = {
        let quiz = quiz.clone();
        use_callback(move |()| {
            let mut session = signals.session;
            let progress = {
                let mut guard = session.write();
                let Some(current) = guard.as_mut() else {
                    return;
                };
                quiz.step(current)
            };
            match progress {
                Ok(Progress::Next { .. }) => {}
                Ok(Progress::Finished) => {
                    navigator.push(Route::Topics {});
                }
                Err(err) => tracing::debug!(error = %err, "advance ignored"),
            }
        })
    };

    let on_retry_results = {
        let quiz = quiz.clone();
        use_callback(move |()| {
            spawn_forever(load_results(quiz.clone(), signals));
        })
    };

    let state = view_state_from_resource(&resource);
    let (question, show_results, result) = {
        let guard = signals.session.read();
        let current = guard.as_ref();
        (
            current.and_then(map_question),
            current.is_some_and(|s| s.is_last() && s.feedback().is_some()),
            current.and_then(QuizSession::result).map(map_result),
        )
    };
    let action_error = *signals.action_error.read();
    let results_error = *signals.results_error.read();
    let results_loading = *signals.results_loading.read();

    rsx! {
        div { class: "page quiz",
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { class: "loading", "Loading questions..." }
                },
                ViewState::Error(ViewError::NoQuestions) => rsx! {
                    div { class: "empty-state",
                        h2 { "No questions available" }
                        p { "Please try another topic." }
                        Link { class: "button", to: Route::Topics {}, "Back to Topics" }
                    }
                },
                ViewState::Error(err) => rsx! {
                    ErrorPanel {
                        error: err,
                        on_retry: move |()| {
                            let mut resource = resource;
                            resource.restart();
                        },
                    }
                },
                ViewState::Ready(()) => rsx! {
                    if let Some(question) = question {
                        QuestionCard { question, error: action_error, on_select, on_next }
                    }
                    if show_results {
                        ResultsPanel {
                            result,
                            loading: results_loading,
                            error: results_error,
                            on_retry: on_retry_results,
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn QuestionCard(
    question: QuestionVm,
    error: Option<ViewError>,
    on_select: EventHandler<String>,
    on_next: EventHandler<()>,
) -> Element {
    let can_advance = question.can_advance();
    rsx! {
        section { class: "question-card",
            div { class: "question-meta",
                span { "{question.progress_label}" }
                span { "{question.difficulty_label}" }
            }
            h2 { class: "question-text", "{question.text}" }

            div { class: "options",
                for option in question.options.clone() {
                    button {
                        key: "{option.text}",
                        class: "{option.class}",
                        disabled: option.disabled,
                        onclick: {
                            let text = option.text.clone();
                            move |_| on_select.call(text.clone())
                        },
                        "{option.text}"
                    }
                }
            }

            if question.pending {
                p { class: "loading", "Checking your answer..." }
            }
            match error {
                Some(ViewError::SessionExpired) => rsx! {
                    ErrorPanel { error: ViewError::SessionExpired, on_retry: move |()| {} }
                },
                Some(_) => rsx! {
                    p { class: "error", "Could not submit your answer. Please try again." }
                },
                None => rsx! {},
            }

            if let Some(explanation) = question.explanation.clone() {
                div { class: "explanation",
                    h3 { "Explanation" }
                    p { "{explanation}" }
                }
            }
            if can_advance {
                div { class: "actions",
                    button { class: "button", onclick: move |_| on_next.call(()), "{question.next_label}" }
                }
            }
        }
    }
}

#[component]
fn ResultsPanel(
    result: Option<ResultVm>,
    loading: bool,
    error: Option<ViewError>,
    on_retry: EventHandler<()>,
) -> Element {
    rsx! {
        section { class: "results",
            h3 { "Quiz Results" }
            match (result, error) {
                (Some(result), _) => rsx! {
                    p { class: "score", "{result.percent}%" }
                    p { "{result.score_line}" }
                    p { "{result.average_line}" }
                },
                (None, _) if loading => rsx! {
                    p { class: "loading", "Loading results..." }
                },
                (None, Some(err)) => rsx! {
                    ErrorPanel { error: err, on_retry }
                },
                (None, None) => rsx! {},
            }
        }
    }
}
