use std::sync::LazyLock;

use crate::Flow;
use crate::shape::{FieldSpec, InputShape, NumericRange, OutputField, OutputKind};

/// First-aid guidance while help is on the way.
pub struct EmergencyAssistance;

impl Flow for EmergencyAssistance {
    fn id(&self) -> &str {
        "emergency_assistance"
    }

    fn name(&self) -> &str {
        "Emergency Assistance"
    }

    fn description(&self) -> &str {
        "Step-by-step first-aid guidance for a described emergency."
    }

    fn input_shape(&self) -> &InputShape {
        static SHAPE: LazyLock<InputShape> = LazyLock::new(|| {
            InputShape::new(vec![
                FieldSpec::long_text("situation", "What is happening", 2000).required(),
                FieldSpec::number("patientAgeYears", "Patient age (years)", NumericRange::between(0.0, 120.0)),
                FieldSpec::boolean("isConscious", "Patient is conscious"),
            ])
        });
        &SHAPE
    }

    fn output_fields(&self) -> &[OutputField] {
        static FIELDS: LazyLock<Vec<OutputField>> = LazyLock::new(|| {
            vec![
                OutputField::new("callEmergencyServices", "Call emergency services", OutputKind::Boolean),
                OutputField::new("immediateSteps", "Immediate steps", OutputKind::List),
                OutputField::new("doNot", "Do not", OutputKind::List),
                OutputField::new("summary", "Summary", OutputKind::Text),
            ]
        });
        &FIELDS
    }

    fn role_prompt(&self) -> &str {
        "You give calm, ordered first-aid instructions. Always say whether \
         emergency services should be called."
    }

    fn template(&self) -> &str {
        "Situation: {{ situation }}\n\
         {% if patientAgeYears is defined %}Age: {{ patientAgeYears }} years\n{% endif %}\
         {% if isConscious is defined %}Conscious: {{ isConscious }}\n{% endif %}"
    }
}
