use std::sync::LazyLock;

use zuruu_core::models::mode::Mode;

use crate::Flow;
use crate::flows::two_step;
use crate::shape::{InputShape, OutputField};

/// Generate step of the OSCE station simulator.
pub struct GenerateStation;

/// Evaluate step of the OSCE station simulator.
pub struct EvaluateStation;

impl Flow for GenerateStation {
    fn id(&self) -> &str {
        "osce_station_generate"
    }

    fn name(&self) -> &str {
        "OSCE Station Generator"
    }

    fn description(&self) -> &str {
        "Builds an OSCE station scenario with examiner questions."
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
        "You design OSCE stations for pharmacy finals. \"caseDetails\" is an \
         object with \"stationBrief\", \"patientScript\" and \"timeLimitMinutes\"."
    }

    fn template(&self) -> &str {
        "Design an OSCE station on {{ topic }}."
    }
}

impl Flow for EvaluateStation {
    fn id(&self) -> &str {
        "osce_station_evaluate"
    }

    fn name(&self) -> &str {
        "OSCE Station Feedback"
    }

    fn description(&self) -> &str {
        "Marks a candidate's responses to an OSCE station."
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
        "You are an OSCE examiner. Mark against a checklist, give a score out \
         of 100 and the expected response for each question."
    }

    fn template(&self) -> &str {
        two_step::EVALUATE_TEMPLATE
    }
}
