//! Integration tests for form-answer

use std::time::Duration;

use form_answer::{
    AnswerApi, AnswerId, AnswerSession, AnswerValue, ComparisonSelector, ComparisonView, EngineError, Form,
    FormId, MemoryApi, PersistedAnswer, Question, QuestionId, SubmitState, User, align, codec,
};

fn scenario_form() -> Form {
    Form::new(
        1,
        "Scenario",
        vec![
            Question::long_text(1, "Anything to add?"),
            Question::single_choice(2, "Pick one", ["A", "B"]),
        ],
    )
}

fn scenario_api() -> MemoryApi {
    MemoryApi::new().with_answer(PersistedAnswer::unanswered(
        100,
        scenario_form(),
        User::new(1, "Ana"),
    ))
}

#[tokio::test]
async fn test_scenario_submits_exactly_once() {
    let api = scenario_api();
    let mut session = AnswerSession::load(&api, FormId(1), AnswerId(100))
        .await
        .unwrap();
    assert!(!session.can_submit());

    session.set(QuestionId(1), AnswerValue::text("yes")).unwrap();
    session.set(QuestionId(2), AnswerValue::choice("B")).unwrap();
    assert!(session.is_ready());

    let stored = session.submit(&api).await.unwrap().clone();
    assert!(stored.user_has_answered);
    assert_eq!(session.state(), SubmitState::Submitted);
    assert_eq!(api.submit_count(), 1);

    let decoded = codec::decode(&stored.form, stored.user_answers.as_deref().unwrap()).unwrap();
    assert_eq!(decoded.get(QuestionId(1)), Some(&AnswerValue::text("yes")));
    assert_eq!(decoded.get(QuestionId(2)), Some(&AnswerValue::choice("B")));

    // A second submit is refused locally; the backend sees nothing.
    assert!(matches!(
        session.submit(&api).await,
        Err(EngineError::AlreadyAnswered(_))
    ));
    assert_eq!(api.submit_count(), 1);
}

#[tokio::test]
async fn test_abandoned_submit_is_settled_by_refetching() {
    let api = scenario_api();
    let mut session = AnswerSession::load(&api, FormId(1), AnswerId(100))
        .await
        .unwrap();
    session.set(QuestionId(1), AnswerValue::text("yes")).unwrap();
    session.set(QuestionId(2), AnswerValue::choice("B")).unwrap();

    // The write lands, but the caller stops waiting before it sees the response.
    let payload = session.begin_submit().unwrap();
    api.submit_answer(AnswerId(100), &payload).await.unwrap();
    session.abandon_submit();

    assert!(matches!(
        session.submit(&api).await,
        Err(EngineError::SubmitOutcomeUnknown(AnswerId(100)))
    ));
    assert_eq!(api.submit_count(), 1);

    assert_eq!(session.refresh(&api).await.unwrap(), SubmitState::Submitted);
    assert!(session.answer().user_has_answered);
    assert!(session.submit(&api).await.is_err());
    assert_eq!(api.submit_count(), 1);
}

#[tokio::test]
async fn test_incomplete_draft_never_reaches_backend() {
    let api = scenario_api();
    let mut session = AnswerSession::load(&api, FormId(1), AnswerId(100))
        .await
        .unwrap();
    session.set(QuestionId(1), AnswerValue::text("ye")).unwrap();
    session.set(QuestionId(2), AnswerValue::choice("A")).unwrap();

    assert!(matches!(
        session.submit(&api).await,
        Err(EngineError::IncompleteAnswer { .. })
    ));
    assert_eq!(api.submit_count(), 0);
}

#[tokio::test]
async fn test_failed_submit_can_be_retried() {
    let api = scenario_api();
    let mut session = AnswerSession::load(&api, FormId(1), AnswerId(100))
        .await
        .unwrap();
    session.set(QuestionId(1), AnswerValue::text("yes")).unwrap();
    session.set(QuestionId(2), AnswerValue::choice("A")).unwrap();

    api.fail_next_submit("gateway timeout");
    let err = session.submit(&api).await.unwrap_err();
    assert!(err.is_retryable());
    assert!(session.can_submit());
    assert_eq!(
        session.store().get(QuestionId(1)),
        Some(&AnswerValue::text("yes"))
    );
    assert!(!api.answer(AnswerId(100)).unwrap().user_has_answered);

    session.submit(&api).await.unwrap();
    assert!(api.answer(AnswerId(100)).unwrap().user_has_answered);
    assert_eq!(api.submit_count(), 2);
}

#[tokio::test]
async fn test_answered_record_redirects_from_editing() {
    let answered = PersistedAnswer::unanswered(7, scenario_form(), User::new(1, "Ana"))
        .answered_with(r#"{"1":"yes","2":"B"}"#);
    let api = MemoryApi::new().with_answer(answered);

    let result = AnswerSession::load(&api, FormId(1), AnswerId(7)).await;
    assert!(matches!(result, Err(EngineError::AlreadyAnswered(AnswerId(7)))));
}

#[tokio::test]
async fn test_missing_records_surface_as_api_errors() {
    let api = scenario_api();
    let result = AnswerSession::load(&api, FormId(1), AnswerId(404)).await;
    assert!(matches!(result, Err(EngineError::Api(_))));
}

#[tokio::test(start_paused = true)]
async fn test_dropped_load_discards_result() {
    let api = scenario_api().with_latency(Duration::from_secs(5));
    let load = AnswerSession::load(&api, FormId(1), AnswerId(100));

    let outcome = tokio::time::timeout(Duration::from_secs(1), load).await;
    assert!(outcome.is_err());
    assert_eq!(api.submit_count(), 0);
}

#[test]
fn test_round_trip_with_five_selections() {
    let form = Form::new(
        3,
        "Five",
        vec![Question::multiple_choice(
            1,
            "Tick",
            ["one", "two", "three", "four", "five"],
        )],
    );
    let one = form_answer::Draft::new().with(1, AnswerValue::choices(["three"]));
    let all = form_answer::Draft::new().with(
        1,
        AnswerValue::choices(["five", "four", "three", "two", "one"]),
    );

    for draft in [one, all] {
        let payload = codec::encode(&form, &draft).unwrap();
        assert_eq!(codec::decode(&form, &payload).unwrap(), draft);
    }
}

#[test]
fn test_compare_two_submitted_answers() {
    let form = scenario_form();
    let candidates = vec![
        PersistedAnswer::unanswered(1, form.clone(), User::new(1, "Ana"))
            .answered_with(r#"{"1":"first","2":"A"}"#),
        PersistedAnswer::unanswered(2, form.clone(), User::new(2, "Bruno"))
            .answered_with(r#"{"1":"second","2":"oops"}"#),
        PersistedAnswer::unanswered(3, form, User::new(3, "Caio"))
            .answered_with(r#"{"1":"third","2":"B"}"#),
    ];
    let mut selector = ComparisonSelector::new(candidates);
    selector.toggle(AnswerId(1));
    selector.toggle(AnswerId(2));
    selector.toggle(AnswerId(3));
    assert_eq!(selector.selected(), &[AnswerId(1), AnswerId(2)]);

    let ComparisonView::Pair(left, right) = selector.view() else {
        panic!("expected two replays");
    };
    assert!(right.error().is_some());

    let rows = align(&left, &right);
    assert_eq!(rows.len(), 2);
    assert!(rows[1].left.unwrap().is_answered());
    assert!(!rows[1].right.unwrap().is_answered());
}
