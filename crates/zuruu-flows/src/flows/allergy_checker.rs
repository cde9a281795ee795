use std::sync::LazyLock;

use zuruu_core::models::mode::Mode;

use crate::Flow;
use crate::shape::{FieldSpec, InputShape, OutputField, OutputKind};

pub struct AllergyChecker;

impl Flow for AllergyChecker {
    fn id(&self) -> &str {
        "allergy_checker"
    }

    fn name(&self) -> &str {
        "Allergy Checker"
    }

    fn description(&self) -> &str {
        "Checks a medication against known allergies, including cross-reactivity."
    }

    fn audience(&self) -> &[Mode] {
        &[Mode::Pharmacist, Mode::Patient]
    }

    fn input_shape(&self) -> &InputShape {
        static SHAPE: LazyLock<InputShape> = LazyLock::new(|| {
            InputShape::new(vec![
                FieldSpec::text("medication", "Medication").required(),
                FieldSpec::list("knownAllergies", "Known allergies", 1).required(),
            ])
        });
        &SHAPE
    }

    fn output_fields(&self) -> &[OutputField] {
        static FIELDS: LazyLock<Vec<OutputField>> = LazyLock::new(|| {
            vec![
                OutputField::new("isSafe", "Safe to use", OutputKind::Boolean),
                OutputField::new("crossReactivity", "Cross-reactivity", OutputKind::List),
                OutputField::new("alternatives", "Alternatives", OutputKind::List),
                OutputField::new("explanation", "Explanation", OutputKind::Text),
            ]
        });
        &FIELDS
    }

    fn role_prompt(&self) -> &str {
        "You are a pharmacist screening for drug allergies. Be conservative: \
         when cross-reactivity is plausible, say so and suggest alternatives."
    }

    fn template(&self) -> &str {
        "Medication: {{ medication }}\n\
         Known allergies: {{ knownAllergies | join(sep=\", \") }}\n\
         Is this medication safe for this patient?"
    }
}
