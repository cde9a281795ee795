//! Generate-then-evaluate flow pairs.
//!
//! The clinical case simulator and the OSCE station generator share one
//! sequence: generate a case for a topic, collect one answer per question,
//! evaluate the answers against the same case. [`TwoStepOrchestrator`] runs
//! that sequence for any pair of flows that speak the shared vocabulary in
//! `zuruu_flows::flows::two_step`.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};
use zuruu_bedrock::invoker::FlowInvoker;
use zuruu_core::models::payload::{ErrorPayload, SuccessPayload};
use zuruu_flows::Flow;
use zuruu_flows::flows::two_step::{CASE_DETAILS, QUESTIONS, STUDENT_ANSWERS, TOPIC};
use zuruu_flows::flows::{clinical_case, osce};
use zuruu_flows::shape::{FieldError, FieldErrors, RawInput};

use crate::error::TwoStepError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    AwaitingCase,
    CaseReady,
    AwaitingFeedback,
    FeedbackReady,
}

/// State of one simulator run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TwoStepSession {
    step: Step,
    topic: Option<String>,
    case_details: Option<Value>,
    questions: Vec<String>,
    answers: Vec<String>,
    feedback: Option<SuccessPayload>,
}

impl Default for TwoStepSession {
    fn default() -> Self {
        Self {
            step: Step::AwaitingCase,
            topic: None,
            case_details: None,
            questions: Vec::new(),
            answers: Vec::new(),
            feedback: None,
        }
    }
}

impl TwoStepSession {
    pub fn step(&self) -> Step {
        self.step
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    pub fn case_details(&self) -> Option<&Value> {
        self.case_details.as_ref()
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn feedback(&self) -> Option<&SuccessPayload> {
        self.feedback.as_ref()
    }
}

pub struct TwoStepOrchestrator {
    generate: Arc<dyn Flow>,
    evaluate: Arc<dyn Flow>,
    session: TwoStepSession,
}

impl TwoStepOrchestrator {
    pub fn new(generate: Arc<dyn Flow>, evaluate: Arc<dyn Flow>) -> Self {
        Self {
            generate,
            evaluate,
            session: TwoStepSession::default(),
        }
    }

    pub fn clinical_case() -> Self {
        Self::new(
            Arc::new(clinical_case::GenerateCase),
            Arc::new(clinical_case::EvaluateCase),
        )
    }

    pub fn osce_station() -> Self {
        Self::new(Arc::new(osce::GenerateStation), Arc::new(osce::EvaluateStation))
    }

    pub fn session(&self) -> &TwoStepSession {
        &self.session
    }

    pub fn step(&self) -> Step {
        self.session.step
    }

    /// Generate a case for `topic`.
    ///
    /// On failure the orchestrator stays in `AwaitingCase`. A reply without
    /// a case or without questions cannot be answered and counts as a
    /// failure.
    pub async fn generate_case(
        &mut self,
        invoker: &FlowInvoker,
        topic: &str,
    ) -> Result<&TwoStepSession, TwoStepError> {
        self.expect_step("generate a case", Step::AwaitingCase)?;

        let mut raw = RawInput::new();
        raw.insert(TOPIC.to_string(), Value::from(topic));
        let input = self.generate.validate(&raw)?;

        let payload = invoker
            .invoke(self.generate.as_ref(), &input)
            .await
            .into_result()
            .map_err(TwoStepError::Flow)?;

        let case_details = payload.get(CASE_DETAILS).cloned();
        let questions = payload.get_strings(QUESTIONS).unwrap_or_default();
        let returned = payload
            .get(QUESTIONS)
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        let Some(case_details) = case_details.filter(|_| !questions.is_empty()) else {
            warn!(
                flow_id = self.generate.id(),
                has_case_details = payload.get(CASE_DETAILS).is_some(),
                questions_returned = returned,
                non_text_questions_dropped = returned - questions.len(),
                "generated case is missing details or questions"
            );
            return Err(TwoStepError::Flow(ErrorPayload::generic()));
        };

        info!(
            flow_id = self.generate.id(),
            questions = questions.len(),
            "case ready"
        );
        self.session = TwoStepSession {
            step: Step::CaseReady,
            topic: input.get_text(TOPIC).map(str::to_string),
            case_details: Some(case_details),
            answers: vec![String::new(); questions.len()],
            questions,
            feedback: None,
        };
        Ok(&self.session)
    }

    /// Record the answer to question `index` (zero-based).
    pub fn set_answer(&mut self, index: usize, text: impl Into<String>) -> Result<(), TwoStepError> {
        self.expect_step("answer", Step::CaseReady)?;

        let questions = self.session.questions.len();
        let slot = self
            .session
            .answers
            .get_mut(index)
            .ok_or(TwoStepError::AnswerOutOfRange { index, questions })?;
        *slot = text.into();
        Ok(())
    }

    /// Send the answers for evaluation against the same case.
    ///
    /// Every question needs a non-blank answer. On failure the orchestrator
    /// returns to `CaseReady` with the case and answers untouched.
    pub async fn submit_answers(
        &mut self,
        invoker: &FlowInvoker,
    ) -> Result<&TwoStepSession, TwoStepError> {
        self.expect_step("submit answers", Step::CaseReady)?;

        let unanswered: Vec<usize> = self
            .session
            .answers
            .iter()
            .enumerate()
            .filter(|(_, a)| a.trim().is_empty())
            .map(|(i, _)| i + 1)
            .collect();
        if !unanswered.is_empty() {
            let numbers: Vec<String> = unanswered.iter().map(|n| n.to_string()).collect();
            return Err(TwoStepError::Invalid(FieldErrors(vec![FieldError {
                field: STUDENT_ANSWERS.to_string(),
                message: format!("Answer every question (missing: {})", numbers.join(", ")),
            }])));
        }

        let mut raw = RawInput::new();
        raw.insert(TOPIC.to_string(), Value::from(self.session.topic.clone()));
        raw.insert(
            CASE_DETAILS.to_string(),
            self.session.case_details.clone().unwrap_or(Value::Null),
        );
        raw.insert(STUDENT_ANSWERS.to_string(), Value::from(self.session.answers.clone()));
        let input = self.evaluate.validate(&raw)?;

        self.session.step = Step::AwaitingFeedback;
        let response = invoker.invoke(self.evaluate.as_ref(), &input).await;

        match response.into_result() {
            Ok(feedback) => {
                info!(flow_id = self.evaluate.id(), "feedback ready");
                self.session.feedback = Some(feedback);
                self.session.step = Step::FeedbackReady;
                Ok(&self.session)
            }
            Err(error) => {
                self.session.step = Step::CaseReady;
                Err(TwoStepError::Flow(error))
            }
        }
    }

    /// Discard the run and start over.
    pub fn reset(&mut self) {
        self.session = TwoStepSession::default();
    }

    fn expect_step(&self, operation: &'static str, expected: Step) -> Result<(), TwoStepError> {
        if self.session.step == expected {
            Ok(())
        } else {
            Err(TwoStepError::InvalidState {
                operation,
                step: self.session.step,
            })
        }
    }
}
