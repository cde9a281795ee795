use std::sync::LazyLock;

use zuruu_core::models::mode::Mode;

use crate::Flow;
use crate::shape::{FieldSpec, InputShape, OutputField, OutputKind};

pub struct CareerGuidance;

pub const STAGES: &[&str] = &["student", "graduate", "early_career", "experienced"];

impl Flow for CareerGuidance {
    fn id(&self) -> &str {
        "career_guidance"
    }

    fn name(&self) -> &str {
        "Career Guidance"
    }

    fn description(&self) -> &str {
        "Suggests pharmacy career paths and next steps."
    }

    fn audience(&self) -> &[Mode] {
        &[Mode::Student, Mode::Pharmacist]
    }

    fn input_shape(&self) -> &InputShape {
        static SHAPE: LazyLock<InputShape> = LazyLock::new(|| {
            InputShape::new(vec![
                FieldSpec::list("interests", "Interests", 1).required(),
                FieldSpec::choice("stage", "Career stage", STAGES).required(),
                FieldSpec::text("region", "Region"),
            ])
        });
        &SHAPE
    }

    fn output_fields(&self) -> &[OutputField] {
        static FIELDS: LazyLock<Vec<OutputField>> = LazyLock::new(|| {
            vec![
                OutputField::new("paths", "Suggested paths", OutputKind::List),
                OutputField::new("skillsToBuild", "Skills to build", OutputKind::List),
                OutputField::new("nextSteps", "Next steps", OutputKind::List),
            ]
        });
        &FIELDS
    }

    fn role_prompt(&self) -> &str {
        "You are a careers advisor for pharmacy students and pharmacists."
    }

    fn template(&self) -> &str {
        "Interests: {{ interests | join(sep=\", \") }}\n\
         Stage: {{ stage }}\n\
         {% if region %}Region: {{ region }}\n{% endif %}"
    }
}
