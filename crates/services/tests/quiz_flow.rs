use quiz_core::model::{ProfileDraft, TopicId};
use quiz_core::time::fixed_clock;
use services::{AdvanceOutcome, AppServices, SubmitError};

async fn signed_in_demo() -> AppServices {
    let app = AppServices::demo(fixed_clock(), 10);
    app.session_store()
        .login("demo@example.com", "demo")
        .await
        .unwrap();
    app
}

#[tokio::test]
async fn rag_topic_runs_to_completion() {
    let app = signed_in_demo().await;
    let quiz = app.quiz();

    let topics = app.topics().list_topics().await.unwrap();
    let rag = topics.iter().find(|t| t.name == "RAG Systems").unwrap();
    assert_eq!(rag.difficulty.level(), 3);

    let mut session = quiz
        .start_session(rag.id, quiz.question_count())
        .await
        .unwrap();
    assert_eq!(session.total(), 2);

    let correct = session.current_question().unwrap().correct_answer().to_owned();
    let feedback = quiz.select_answer(&mut session, &correct).await.unwrap();
    assert!(feedback.is_correct);
    assert_eq!(feedback.explanation.as_deref(), Some("Your answer is correct!"));
    assert_eq!(
        quiz.advance(&mut session).await.unwrap(),
        AdvanceOutcome::Next { position: 2 }
    );

    let question = session.current_question().unwrap().clone();
    let wrong = question
        .options()
        .iter()
        .find(|o| !question.is_correct(o))
        .unwrap()
        .clone();
    let feedback = quiz.select_answer(&mut session, &wrong).await.unwrap();
    assert!(!feedback.is_correct);
    assert_eq!(feedback.explanation.as_deref(), Some(question.explanation()));

    let AdvanceOutcome::Completed { result: Some(result) } = quiz.advance(&mut session).await.unwrap()
    else {
        panic!("quiz should be complete with a result");
    };
    assert_eq!(result.topic_id, rag.id);
    assert_eq!(result.total_questions, 2);
    assert_eq!(result.correct_answers, 1);
    assert!(session.is_complete());

    let history = app.profile().load_history().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].topic_name, "RAG Systems");
    assert_eq!(history[0].correct_answers, 1);
}

#[tokio::test]
async fn every_question_takes_one_advance() {
    let app = signed_in_demo().await;
    let quiz = app.quiz();
    let mut session = quiz.start_session(TopicId::new(1), 10).await.unwrap();

    let mut advances = 0;
    while !session.is_complete() {
        let answer = session.current_question().unwrap().options()[0].clone();
        quiz.select_answer(&mut session, &answer).await.unwrap();
        quiz.advance(&mut session).await.unwrap();
        advances += 1;
    }
    assert_eq!(advances, session.total());
    assert_eq!(session.answered_count(), session.total());
}

#[tokio::test]
async fn profile_update_refreshes_cached_identity() {
    let app = signed_in_demo().await;
    let user = app.session_store().current_user().unwrap();

    let mut draft = ProfileDraft::from_user(&user);
    draft.full_name = "Renamed Learner".into();
    let updated = app.profile().update_profile(draft).await.unwrap();

    assert_eq!(updated.full_name, "Renamed Learner");
    assert_eq!(app.session_store().current_user(), Some(updated));
}

#[tokio::test]
async fn invalid_profile_edit_is_rejected_locally() {
    let app = signed_in_demo().await;
    let user = app.session_store().current_user().unwrap();

    let mut draft = ProfileDraft::from_user(&user);
    draft.full_name = "   ".into();
    let err = app.profile().update_profile(draft).await.unwrap_err();

    assert!(matches!(err, SubmitError::Invalid(_)));
    assert_eq!(app.session_store().current_user(), Some(user));
}
