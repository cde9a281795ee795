use std::sync::Arc;

use serde_json::json;
use zuruu_bedrock::error::BedrockError;
use zuruu_bedrock::invoker::FlowInvoker;
use zuruu_bedrock::scripted::ScriptedProvider;
use zuruu_core::models::payload::GENERIC_ERROR_MESSAGE;
use zuruu_session::error::TwoStepError;
use zuruu_session::orchestrator::{Step, TwoStepOrchestrator};

fn setup() -> (Arc<ScriptedProvider>, FlowInvoker) {
    let provider = Arc::new(ScriptedProvider::new());
    let invoker = FlowInvoker::new(provider.clone());
    (provider, invoker)
}

fn hypertension_case() -> serde_json::Value {
    json!({
        "caseDetails": {
            "patientProfile": "58-year-old man",
            "history": "BP 162/98 on two visits",
            "medications": [],
        },
        "questions": [
            "What is the first-line treatment?",
            "Which lab tests should be ordered?",
        ],
    })
}

#[tokio::test]
async fn hypertension_case_runs_to_feedback() {
    let (provider, invoker) = setup();
    provider.push_json(hypertension_case());
    provider.push_json(json!({ "feedback": "Good reasoning.", "score": 8 }));

    let mut sim = TwoStepOrchestrator::clinical_case();
    assert_eq!(sim.step(), Step::AwaitingCase);

    let session = sim.generate_case(&invoker, "Hypertension").await.unwrap();
    assert_eq!(session.step(), Step::CaseReady);
    assert_eq!(session.questions().len(), 2);
    let case = session.case_details().cloned().unwrap();

    sim.set_answer(0, "Thiazide or ACE inhibitor").unwrap();
    sim.set_answer(1, "Electrolytes and creatinine").unwrap();

    let session = sim.submit_answers(&invoker).await.unwrap();
    assert_eq!(session.step(), Step::FeedbackReady);
    assert_eq!(session.feedback().unwrap().get_str("feedback"), Some("Good reasoning."));
    assert_eq!(session.case_details(), Some(&case));

    // The evaluate request carries the same case and both answers in order.
    let evaluate = &provider.calls()[1].user_message;
    assert!(evaluate.contains("Topic: Hypertension"));
    assert!(evaluate.contains("BP 162/98 on two visits"));
    assert!(evaluate.contains("1. Thiazide or ACE inhibitor"));
    assert!(evaluate.contains("2. Electrolytes and creatinine"));
}

#[tokio::test]
async fn failed_generation_stays_awaiting_case() {
    let (provider, invoker) = setup();
    provider.push_failure(BedrockError::Timeout);

    let mut sim = TwoStepOrchestrator::osce_station();
    let err = sim.generate_case(&invoker, "Asthma inhaler technique").await.unwrap_err();

    assert!(matches!(err, TwoStepError::Flow(ref e) if e.message == GENERIC_ERROR_MESSAGE));
    assert_eq!(sim.step(), Step::AwaitingCase);
}

#[tokio::test]
async fn case_without_questions_is_a_failure() {
    let (provider, invoker) = setup();
    provider.push_json(json!({ "caseDetails": { "patientProfile": "A child" } }));

    let mut sim = TwoStepOrchestrator::clinical_case();
    assert!(matches!(
        sim.generate_case(&invoker, "Otitis media").await,
        Err(TwoStepError::Flow(_))
    ));
    assert_eq!(sim.step(), Step::AwaitingCase);
}

#[tokio::test]
async fn case_with_structured_questions_is_a_failure() {
    let (provider, invoker) = setup();
    provider.push_json(json!({
        "caseDetails": { "patientProfile": "A child" },
        "questions": [{ "question": "What is the likely diagnosis?" }],
    }));

    let mut sim = TwoStepOrchestrator::clinical_case();
    assert!(matches!(
        sim.generate_case(&invoker, "Otitis media").await,
        Err(TwoStepError::Flow(_))
    ));
    assert_eq!(sim.step(), Step::AwaitingCase);
    assert!(sim.session().questions().is_empty());
}

#[tokio::test]
async fn blank_topic_is_rejected_without_invoking() {
    let (provider, invoker) = setup();
    let mut sim = TwoStepOrchestrator::clinical_case();

    let Err(TwoStepError::Invalid(errors)) = sim.generate_case(&invoker, "   ").await else {
        panic!("expected validation failure");
    };
    assert!(errors.for_field("topic").is_some());
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn failed_evaluation_returns_to_case_ready() {
    let (provider, invoker) = setup();
    provider.push_json(hypertension_case());
    provider.push_reply("not json");

    let mut sim = TwoStepOrchestrator::clinical_case();
    sim.generate_case(&invoker, "Hypertension").await.unwrap();
    sim.set_answer(0, "ACE inhibitor").unwrap();
    sim.set_answer(1, "Renal panel").unwrap();
    let before = sim.session().clone();

    assert!(matches!(sim.submit_answers(&invoker).await, Err(TwoStepError::Flow(_))));
    assert_eq!(sim.step(), Step::CaseReady);
    assert_eq!(sim.session(), &before);
}

#[tokio::test]
async fn unanswered_questions_block_submission() {
    let (provider, invoker) = setup();
    provider.push_json(hypertension_case());

    let mut sim = TwoStepOrchestrator::clinical_case();
    sim.generate_case(&invoker, "Hypertension").await.unwrap();
    sim.set_answer(0, "ACE inhibitor").unwrap();

    let Err(TwoStepError::Invalid(errors)) = sim.submit_answers(&invoker).await else {
        panic!("expected validation failure");
    };
    assert!(errors.for_field("studentAnswers").unwrap().message.contains('2'));
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn operations_out_of_order_are_refused() {
    let (provider, invoker) = setup();
    let mut sim = TwoStepOrchestrator::clinical_case();

    assert!(matches!(
        sim.submit_answers(&invoker).await,
        Err(TwoStepError::InvalidState { step: Step::AwaitingCase, .. })
    ));
    assert!(matches!(
        sim.set_answer(0, "early"),
        Err(TwoStepError::InvalidState { .. })
    ));

    provider.push_json(hypertension_case());
    sim.generate_case(&invoker, "Hypertension").await.unwrap();
    assert!(matches!(
        sim.generate_case(&invoker, "Diabetes").await,
        Err(TwoStepError::InvalidState { step: Step::CaseReady, .. })
    ));
    assert!(matches!(
        sim.set_answer(5, "too far"),
        Err(TwoStepError::AnswerOutOfRange { index: 5, questions: 2 })
    ));
}

#[tokio::test]
async fn reset_starts_over() {
    let (provider, invoker) = setup();
    provider.push_json(hypertension_case());

    let mut sim = TwoStepOrchestrator::clinical_case();
    sim.generate_case(&invoker, "Hypertension").await.unwrap();
    sim.reset();

    assert_eq!(sim.step(), Step::AwaitingCase);
    assert!(sim.session().case_details().is_none());
    assert!(sim.session().questions().is_empty());
}
