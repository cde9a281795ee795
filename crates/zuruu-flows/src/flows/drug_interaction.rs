use std::sync::LazyLock;

use zuruu_core::models::mode::Mode;

use crate::Flow;
use crate::shape::{FieldSpec, InputShape, OutputField, OutputKind};

pub struct DrugInteractionChecker;

impl Flow for DrugInteractionChecker {
    fn id(&self) -> &str {
        "drug_interaction_checker"
    }

    fn name(&self) -> &str {
        "Drug Interaction Checker"
    }

    fn description(&self) -> &str {
        "Lists clinically relevant interactions between two or more medications."
    }

    fn audience(&self) -> &[Mode] {
        &[Mode::Pharmacist, Mode::Student]
    }

    fn input_shape(&self) -> &InputShape {
        static SHAPE: LazyLock<InputShape> = LazyLock::new(|| {
            InputShape::new(vec![
                FieldSpec::list("medications", "Medications", 2).required(),
                FieldSpec::long_text("clinicalContext", "Clinical context", 2000),
            ])
        });
        &SHAPE
    }

    fn output_fields(&self) -> &[OutputField] {
        static FIELDS: LazyLock<Vec<OutputField>> = LazyLock::new(|| {
            vec![
                OutputField::new("interactions", "Interactions", OutputKind::List),
                OutputField::new("severity", "Overall severity", OutputKind::Text),
                OutputField::new("recommendations", "Recommendations", OutputKind::List),
                OutputField::new("summary", "Summary", OutputKind::Text),
            ]
        });
        &FIELDS
    }

    fn role_prompt(&self) -> &str {
        "You are a drug information pharmacist. Report interactions by pair, \
         with mechanism, severity (minor, moderate, major, contraindicated) and management."
    }

    fn template(&self) -> &str {
        "Check these medications for interactions: {{ medications | join(sep=\", \") }}.\n\
         {% if clinicalContext %}Clinical context: {{ clinicalContext }}\n{% endif %}"
    }
}
