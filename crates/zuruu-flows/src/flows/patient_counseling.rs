use std::sync::LazyLock;

use zuruu_core::models::mode::Mode;

use crate::Flow;
use crate::shape::{FieldSpec, InputShape, OutputField, OutputKind};

/// Counseling points for a medication, tailored to the active patient.
pub struct PatientCounseling;

impl Flow for PatientCounseling {
    fn id(&self) -> &str {
        "patient_counseling"
    }

    fn name(&self) -> &str {
        "Patient Counseling"
    }

    fn description(&self) -> &str {
        "Produces counseling points for a medication using the active patient's history."
    }

    fn audience(&self) -> &[Mode] {
        &[Mode::Pharmacist]
    }

    fn input_shape(&self) -> &InputShape {
        static SHAPE: LazyLock<InputShape> = LazyLock::new(|| {
            InputShape::new(vec![
                FieldSpec::text("medication", "Medication").required(),
                FieldSpec::choice("language", "Language", &["english", "urdu"]),
            ])
        });
        &SHAPE
    }

    fn output_fields(&self) -> &[OutputField] {
        static FIELDS: LazyLock<Vec<OutputField>> = LazyLock::new(|| {
            vec![
                OutputField::new("keyPoints", "Key points", OutputKind::List),
                OutputField::new("sideEffects", "Side effects to watch for", OutputKind::List),
                OutputField::new("lifestyleAdvice", "Lifestyle advice", OutputKind::List),
                OutputField::new("whenToSeekHelp", "When to seek help", OutputKind::Text),
            ]
        });
        &FIELDS
    }

    fn role_prompt(&self) -> &str {
        "You are a community pharmacist counseling a patient in plain language. \
         Take the patient's history and allergies into account."
    }

    fn template(&self) -> &str {
        "Prepare counseling for {{ medication }}.\n\
         {% if language %}Write in {{ language }}.\n{% endif %}"
    }

    fn uses_patient_context(&self) -> bool {
        true
    }
}
