//! zuruu-flows
//!
//! Flow definitions. Pure data and pure functions, no provider dependency.
//! Each flow declares its input shape, its output fields, and the
//! instruction template the invoker merges the validated input into.
//! The local tools (adherence, unit conversion) live here too since they
//! never reach a provider.

pub mod error;
pub mod flows;
pub mod shape;
pub mod tools;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use zuruu_core::models::mode::Mode;

use shape::{FieldErrors, InputShape, OutputField, RawInput, ValidatedInput};

/// Trait implemented by each flow.
pub trait Flow: Send + Sync {
    /// Unique identifier, also the URL segment (e.g. "dose_calculator").
    fn id(&self) -> &str;

    /// Human-readable name (e.g. "Dose Calculator").
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Modes whose menus list this flow.
    fn audience(&self) -> &[Mode] {
        &Mode::ALL
    }

    fn input_shape(&self) -> &InputShape;

    /// Fields the provider is asked to return. All of them are optional in
    /// the reply.
    fn output_fields(&self) -> &[OutputField];

    /// Fixed framing sent as the system prompt.
    fn role_prompt(&self) -> &str;

    /// Tera template the validated input is rendered into.
    fn template(&self) -> &str;

    /// Whether the active patient record is appended to the request.
    fn uses_patient_context(&self) -> bool {
        false
    }

    /// Validate raw form input against this flow's shape.
    fn validate(&self, raw: &RawInput) -> Result<ValidatedInput, FieldErrors> {
        self.input_shape().validate(self.id(), raw)
    }

    fn descriptor(&self) -> FlowDescriptor {
        FlowDescriptor {
            id: self.id().to_string(),
            name: self.name().to_string(),
            description: self.description().to_string(),
            audience: self.audience().to_vec(),
            input_shape: self.input_shape().clone(),
            output_fields: self.output_fields().to_vec(),
            uses_patient_context: self.uses_patient_context(),
        }
    }
}

/// Serializable summary of a flow, for the UI to build its form from.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FlowDescriptor {
    pub id: String,
    pub name: String,
    pub description: String,
    pub audience: Vec<Mode>,
    pub input_shape: InputShape,
    pub output_fields: Vec<OutputField>,
    pub uses_patient_context: bool,
}

/// Return all registered flows.
pub fn all_flows() -> Vec<Box<dyn Flow>> {
    vec![
        Box::new(flows::dose_calculator::DoseCalculator),
        Box::new(flows::drug_interaction::DrugInteractionChecker),
        Box::new(flows::allergy_checker::AllergyChecker),
        Box::new(flows::prescription_reader::PrescriptionReader),
        Box::new(flows::patient_counseling::PatientCounseling),
        Box::new(flows::flashcards::FlashcardGenerator),
        Box::new(flows::career_guidance::CareerGuidance),
        Box::new(flows::emergency::EmergencyAssistance),
        Box::new(flows::clinical_case::GenerateCase),
        Box::new(flows::clinical_case::EvaluateCase),
        Box::new(flows::osce::GenerateStation),
        Box::new(flows::osce::EvaluateStation),
    ]
}

/// Look up a flow by ID.
pub fn get_flow(id: &str) -> Option<Box<dyn Flow>> {
    all_flows().into_iter().find(|f| f.id() == id)
}
