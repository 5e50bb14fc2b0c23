use quiz_core::model::TopicId;

use super::test_harness::{ViewKind, setup_view_harness};

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_invites_visitors_to_sign_in() {
    let mut harness = setup_view_harness(ViewKind::Home, false).await;
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Welcome to LLM Learning Bot"), "missing hero in {html}");
    assert!(html.contains("Get Started"), "missing register link in {html}");
    assert!(html.contains("Sign In"), "missing login link in {html}");
    assert!(html.contains("Featured Topics"), "missing featured section in {html}");
    assert!(html.contains("LLM Orchestration"), "missing featured topic in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_greets_signed_in_user() {
    let mut harness = setup_view_harness(ViewKind::Home, true).await;
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Welcome back, Demo User"), "missing greeting in {html}");
    assert!(!html.contains("Get Started"), "unexpected register link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn navbar_smoke_reflects_auth_state() {
    let mut harness = setup_view_harness(ViewKind::Navbar, false).await;
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Login"), "missing login link in {html}");
    assert!(html.contains("Register"), "missing register link in {html}");
    assert!(!html.contains("Logout"), "unexpected logout in {html}");

    let mut harness = setup_view_harness(ViewKind::Navbar, true).await;
    harness.rebuild();
    let html = harness.render();
    assert!(
        html.contains("Logged in as: demo@example.com"),
        "missing identity in {html}"
    );
    assert!(html.contains("Profile"), "missing profile link in {html}");
    assert!(html.contains("Logout"), "missing logout in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn topics_view_smoke_lists_catalogue() {
    let mut harness = setup_view_harness(ViewKind::Topics, false).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Available Topics"), "missing heading in {html}");
    assert!(html.contains("RAG Systems"), "missing topic in {html}");
    assert!(html.contains("Vector Databases"), "missing topic in {html}");
    assert!(html.contains("Difficulty: 4/5"), "missing difficulty in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn topics_view_smoke_offers_retry_when_offline() {
    let mut harness = setup_view_harness(ViewKind::Topics, false).await;
    harness.api.set_offline(true);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Error loading topics"), "missing error heading in {html}");
    assert!(html.contains("Something went wrong"), "missing message in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_requires_sign_in() {
    let mut harness = setup_view_harness(ViewKind::Quiz(1), false).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Please sign in"), "missing prompt in {html}");
    assert!(!html.contains("Question 1"), "unexpected question in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_shows_first_question() {
    let mut harness = setup_view_harness(ViewKind::Quiz(1), true).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Question 1 of 2"), "missing progress in {html}");
    assert!(html.contains("What does RAG stand for?"), "missing question in {html}");
    assert!(!html.contains("Next Question"), "advance offered before answering in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_handles_unknown_topic() {
    let mut harness = setup_view_harness(ViewKind::Quiz(99), true).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("No questions available"), "missing empty state in {html}");
    assert!(html.contains("Please try another topic."), "missing hint in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn profile_view_smoke_renders_account() {
    let mut harness = setup_view_harness(ViewKind::Profile, true).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Demo User"), "missing name in {html}");
    assert!(html.contains("Account Status"), "missing status label in {html}");
    assert!(html.contains("Active"), "missing status in {html}");
    assert!(html.contains("No quizzes taken yet."), "missing empty history in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn profile_view_smoke_lists_history() {
    let mut harness = setup_view_harness(ViewKind::Profile, true).await;
    let quiz = harness.services.quiz();
    let mut session = quiz.start_session(TopicId::new(1), 10).await.expect("start");
    while !session.is_complete() {
        let correct = session
            .current_question()
            .map(|q| q.correct_answer().to_string())
            .expect("current question");
        quiz.select_answer(&mut session, &correct).await.expect("answer");
        quiz.advance(&mut session).await.expect("advance");
    }

    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("RAG Systems"), "missing topic in {html}");
    assert!(html.contains("2/2"), "missing score in {html}");
    assert!(!html.contains("No quizzes taken yet."), "unexpected empty state in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn profile_view_smoke_ends_revoked_session() {
    let mut harness = setup_view_harness(ViewKind::Profile, true).await;
    harness.api.revoke_tokens();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Please sign in"), "missing prompt in {html}");
    assert!(
        html.contains("Your session has expired. Please log in again."),
        "missing expiry notice in {html}"
    );
    assert!(!harness.services.session_store().is_authenticated());
}
