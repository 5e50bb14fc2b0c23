use dioxus::prelude::*;

use quiz_core::model::{ProfileDraft, User};
use services::{LoadError, SubmitError};

use crate::auth::{self, use_auth};
use crate::context::AppContext;
use crate::views::shared::{ErrorPanel, SignInPrompt};
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{HistoryRowVm, map_history_rows};

#[component]
pub fn ProfileView() -> Element {
    let auth = use_auth();

    if auth.is_validating() {
        return rsx! {
            div { class: "page profile",
                p { class: "loading", "Checking session..." }
            }
        };
    }
    let Some(user) = auth.user() else {
        return rsx! {
            div { class: "page profile",
                SignInPrompt { message: "Sign in to view your profile and quiz history." }
            }
        };
    };

    rsx! {
        div { class: "page profile",
            ProfileCard { key: "{user.id}", user }
            QuizHistory {}
        }
    }
}

fn submit_error_message(err: &SubmitError) -> String {
    match err {
        SubmitError::EmailTaken => "Email already registered".to_string(),
        SubmitError::Invalid(invalid) => invalid.to_string(),
        _ => ViewError::from_submit(err).message().to_string(),
    }
}

#[component]
fn ProfileCard(user: User) -> Element {
    let ctx = use_context::<AppContext>();
    let auth = use_auth();

    {
        let profile = ctx.profile();
        let store = ctx.session_store();
        use_hook(move || {
            spawn(async move {
                match profile.load_profile().await {
                    Ok(_) => auth.sync(&store),
                    Err(LoadError::Unauthorized) => auth::expire(store, auth).await,
                    Err(err) => tracing::debug!(error = %err, "profile refresh failed"),
                }
            });
        });
    }

    let mut editing = use_signal(|| false);
    let mut draft = use_signal(|| ProfileDraft::from_user(&user));
    let error = use_signal(|| None::<String>);
    let expired = use_signal(|| false);
    let saving = use_signal(|| false);

    let on_save = use_callback(move |()| {
        let mut error = error;
        let mut expired = expired;
        let mut saving = saving;
        let mut editing = editing;
        if saving() {
            return;
        }
        saving.set(true);
        error.set(None);

        let profile = ctx.profile();
        let store = ctx.session_store();
        let submitted = draft.read().clone();
        spawn(async move {
            let outcome = profile.update_profile(submitted).await;
            saving.set(false);
            match outcome {
                Ok(_) => {
                    auth.sync(&store);
                    editing.set(false);
                }
                Err(SubmitError::Unauthorized) => expired.set(true),
                Err(err) => error.set(Some(submit_error_message(&err))),
            }
        });
    });

    let on_cancel = {
        let user = user.clone();
        move |_| {
            draft.set(ProfileDraft::from_user(&user));
            editing.set(false);
        }
    };

    let (status, status_class) = if user.is_active {
        ("Active", "status active")
    } else {
        ("Inactive", "status inactive")
    };
    let current = draft.read().clone();

    rsx! {
        section { class: "profile-card",
            div { class: "profile-header",
                h1 { "Profile" }
                if !editing() {
                    button { class: "button", onclick: move |_| editing.set(true), "Edit Profile" }
                }
            }

            if expired() {
                ErrorPanel { error: ViewError::SessionExpired, on_retry: move |()| {} }
            }

            if editing() {
                form {
                    class: "profile-form",
                    onsubmit: move |evt: FormEvent| {
                        evt.prevent_default();
                        on_save.call(());
                    },
                    label { r#for: "profile-name", "Full Name" }
                    input {
                        id: "profile-name",
                        value: "{current.full_name}",
                        oninput: move |evt| draft.write().full_name = evt.value(),
                    }
                    label { r#for: "profile-email", "Email" }
                    input {
                        id: "profile-email",
                        r#type: "email",
                        value: "{current.email}",
                        oninput: move |evt| draft.write().email = evt.value(),
                    }
                    label { r#for: "profile-password", "New Password (optional)" }
                    input {
                        id: "profile-password",
                        r#type: "password",
                        value: "{current.password}",
                        oninput: move |evt| draft.write().password = evt.value(),
                    }
                    if let Some(message) = error() {
                        p { class: "error", "{message}" }
                    }
                    div { class: "actions",
                        button { class: "button secondary", r#type: "button", onclick: on_cancel, "Cancel" }
                        button {
                            class: "button",
                            r#type: "submit",
                            disabled: saving(),
                            if saving() { "Saving..." } else { "Save Changes" }
                        }
                    }
                }
            } else {
                dl { class: "profile-details",
                    dt { "Full Name" }
                    dd { "{user.full_name}" }
                    dt { "Email" }
                    dd { "{user.email}" }
                    dt { "Account Status" }
                    dd { class: "{status_class}", "{status}" }
                }
            }
        }
    }
}

#[component]
fn QuizHistory() -> Element {
    let ctx = use_context::<AppContext>();
    let profile = ctx.profile();

    let resource = use_resource(move || {
        let profile = profile.clone();
        async move {
            let entries = profile.load_history().await.map_err(ViewError::from)?;
            Ok::<_, ViewError>(map_history_rows(&entries))
        }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        section { class: "history",
            h2 { "Quiz History" }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { class: "loading", "Loading..." }
                },
                ViewState::Ready(rows) => rsx! {
                    if rows.is_empty() {
                        p { "No quizzes taken yet." }
                    } else {
                        HistoryTable { rows }
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
            }
        }
    }
}

#[component]
fn HistoryTable(rows: Vec<HistoryRowVm>) -> Element {
    rsx! {
        table { class: "history-table",
            thead {
                tr {
                    th { "Topic" }
                    th { "Score" }
                    th { "Average Time" }
                    th { "Date" }
                }
            }
            tbody {
                for row in rows {
                    tr {
                        td { "{row.topic_name}" }
                        td { "{row.score}" }
                        td { "{row.average}" }
                        td { "{row.date}" }
                    }
                }
            }
        }
    }
}
