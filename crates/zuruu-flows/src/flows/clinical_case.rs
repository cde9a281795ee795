use std::sync::LazyLock;

use zuruu_core::models::mode::Mode;

use crate::Flow;
use crate::flows::two_step;
use crate::shape::{InputShape, OutputField};

/// Generate step of the clinical case simulator.
pub struct GenerateCase;

/// Evaluate step of the clinical case simulator.
pub struct EvaluateCase;

impl Flow for GenerateCase {
    fn id(&self) -> &str {
        "clinical_case_generate"
    }

    fn name(&self) -> &str {
        "Clinical Case Simulator"
    }

    fn description(&self) -> &str {
        "Generates a patient case on a topic with questions for the student."
    }

    fn audience(&self) -> &[Mode] {
        &[Mode::Student]
    }

    fn input_shape(&self) -> &InputShape {
        static SHAPE: LazyLock<InputShape> = LazyLock::new(two_step::generate_shape);
        &SHAPE
    }

    fn output_fields(&self) -> &[OutputField] {
        static FIELDS: LazyLock<Vec<OutputField>> = LazyLock::new(two_step::generate_outputs);
        &FIELDS
    }

    fn role_prompt(&self) -> &str {
        "You write realistic pharmacotherapy cases for pharmacy students. \
         \"caseDetails\" is an object with \"patientProfile\", \"history\", \
         \"medications\" and \"labs\". Ask three to five questions."
    }

    fn template(&self) -> &str {
        "Create a clinical case about {{ topic }}."
    }
}

impl Flow for EvaluateCase {
    fn id(&self) -> &str {
        "clinical_case_evaluate"
    }

    fn name(&self) -> &str {
        "Clinical Case Feedback"
    }

    fn description(&self) -> &str {
        "Grades a student's answers to a generated clinical case."
    }

    fn audience(&self) -> &[Mode] {
        &[Mode::Student]
    }

    fn input_shape(&self) -> &InputShape {
        static SHAPE: LazyLock<InputShape> = LazyLock::new(two_step::evaluate_shape);
        &SHAPE
    }

    fn output_fields(&self) -> &[OutputField] {
        static FIELDS: LazyLock<Vec<OutputField>> = LazyLock::new(two_step::evaluate_outputs);
        &FIELDS
    }

    fn role_prompt(&self) -> &str {
        "You are a clinical pharmacy tutor. Give feedback on each answer, a \
         score out of 100 and a model answer per question."
    }

    fn template(&self) -> &str {
        two_step::EVALUATE_TEMPLATE
    }
}
