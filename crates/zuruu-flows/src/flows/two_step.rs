//! Shared vocabulary of generate-then-evaluate flows.
//!
//! The generate step takes a topic and returns a case plus questions; the
//! evaluate step takes the topic, that same case, and one answer per
//! question, and returns feedback. Both simulators declare the same shapes
//! and differ only in their prompts.

use crate::shape::{FieldSpec, InputShape, OutputField, OutputKind};

pub const TOPIC: &str = "topic";
pub const CASE_DETAILS: &str = "caseDetails";
pub const QUESTIONS: &str = "questions";
pub const STUDENT_ANSWERS: &str = "studentAnswers";
pub const FEEDBACK: &str = "feedback";
pub const SCORE: &str = "score";
pub const MODEL_ANSWERS: &str = "modelAnswers";

pub fn generate_shape() -> InputShape {
    InputShape::new(vec![FieldSpec::text(TOPIC, "Topic").required()])
}

pub fn generate_outputs() -> Vec<OutputField> {
    vec![
        OutputField::new(CASE_DETAILS, "Case details", OutputKind::Any),
        OutputField::new(QUESTIONS, "Questions", OutputKind::List),
    ]
}

pub fn evaluate_shape() -> InputShape {
    InputShape::new(vec![
        FieldSpec::text(TOPIC, "Topic").required(),
        FieldSpec::any(CASE_DETAILS, "Case details").required(),
        FieldSpec::list(STUDENT_ANSWERS, "Your answers", 1).required(),
    ])
}

pub fn evaluate_outputs() -> Vec<OutputField> {
    vec![
        OutputField::new(FEEDBACK, "Feedback", OutputKind::Any),
        OutputField::new(SCORE, "Score", OutputKind::Number),
        OutputField::new(MODEL_ANSWERS, "Model answers", OutputKind::List),
    ]
}

/// Template for the evaluate step, shared by every simulator.
pub const EVALUATE_TEMPLATE: &str = "Topic: {{ topic }}\n\
<case>\n{{ caseDetails | json_encode(pretty=true) | safe }}\n</case>\n\
Student answers, in question order:\n\
{% for answer in studentAnswers %}{{ loop.index }}. {{ answer }}\n{% endfor %}";
