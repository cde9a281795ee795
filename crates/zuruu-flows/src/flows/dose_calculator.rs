use std::sync::LazyLock;

use zuruu_core::models::mode::Mode;

use crate::Flow;
use crate::shape::{FieldSpec, InputShape, NumericRange, OutputField, OutputKind};

/// Weight- and organ-function-adjusted dosing suggestion.
pub struct DoseCalculator;

pub const RENAL_FUNCTION: &[&str] = &["normal", "mild", "moderate", "severe", "dialysis"];
pub const ROUTES: &[&str] = &["oral", "iv", "im", "sc", "topical", "inhaled", "rectal"];

impl Flow for DoseCalculator {
    fn id(&self) -> &str {
        "dose_calculator"
    }

    fn name(&self) -> &str {
        "Dose Calculator"
    }

    fn description(&self) -> &str {
        "Suggests a dose for a drug given the patient's weight, age and renal function."
    }

    fn audience(&self) -> &[Mode] {
        &[Mode::Pharmacist, Mode::Student]
    }

    fn input_shape(&self) -> &InputShape {
        static SHAPE: LazyLock<InputShape> = LazyLock::new(|| {
            InputShape::new(vec![
                FieldSpec::text("drugName", "Drug name").required(),
                FieldSpec::text("indication", "Indication"),
                FieldSpec::number("patientWeightKg", "Patient weight (kg)", NumericRange::positive())
                    .required(),
                FieldSpec::number("patientAgeYears", "Patient age (years)", NumericRange::between(0.0, 120.0)),
                FieldSpec::choice("renalFunction", "Renal function", RENAL_FUNCTION),
                FieldSpec::choice("route", "Route", ROUTES),
            ])
        });
        &SHAPE
    }

    fn output_fields(&self) -> &[OutputField] {
        static FIELDS: LazyLock<Vec<OutputField>> = LazyLock::new(|| {
            vec![
                OutputField::new("recommendedDose", "Recommended dose", OutputKind::Text),
                OutputField::new("frequency", "Frequency", OutputKind::Text),
                OutputField::new("maxDailyDose", "Maximum daily dose", OutputKind::Text),
                OutputField::new("calculation", "How the dose was derived", OutputKind::Text),
                OutputField::new("adjustments", "Adjustments applied", OutputKind::List),
                OutputField::new("warnings", "Warnings", OutputKind::List),
            ]
        });
        &FIELDS
    }

    fn role_prompt(&self) -> &str {
        "You are a clinical pharmacist assisting with dose calculations. \
         Show the arithmetic you used and flag any adjustment for age or renal function."
    }

    fn template(&self) -> &str {
        "Calculate a dose of {{ drugName }} for a patient weighing {{ patientWeightKg }} kg.\n\
         {% if indication %}Indication: {{ indication }}\n{% endif %}\
         {% if patientAgeYears is defined %}Age: {{ patientAgeYears }} years\n{% endif %}\
         {% if renalFunction %}Renal function: {{ renalFunction }}\n{% endif %}\
         {% if route %}Route: {{ route }}\n{% endif %}"
    }
}
