use std::sync::LazyLock;

use serde::Deserialize;
use zuruu_core::models::mode::Mode;
use zuruu_core::models::payload::SuccessPayload;
use zuruu_core::models::prescription::{MedicationEntry, Prescription};

use crate::Flow;
use crate::shape::{FieldSpec, InputShape, OutputField, OutputKind};

/// Turns free prescription text into medication entries. A successful
/// reply is what the session keeps as the last prescription.
pub struct PrescriptionReader;

impl Flow for PrescriptionReader {
    fn id(&self) -> &str {
        "prescription_reader"
    }

    fn name(&self) -> &str {
        "Prescription Reader"
    }

    fn description(&self) -> &str {
        "Extracts medications, doses and directions from prescription text."
    }

    fn audience(&self) -> &[Mode] {
        &[Mode::Pharmacist, Mode::Patient]
    }

    fn input_shape(&self) -> &InputShape {
        static SHAPE: LazyLock<InputShape> = LazyLock::new(|| {
            InputShape::new(vec![
                FieldSpec::long_text("prescriptionText", "Prescription text", 10_000).required(),
            ])
        });
        &SHAPE
    }

    fn output_fields(&self) -> &[OutputField] {
        static FIELDS: LazyLock<Vec<OutputField>> = LazyLock::new(|| {
            vec![
                OutputField::new("medications", "Medications", OutputKind::List),
                OutputField::new("prescriber", "Prescriber", OutputKind::Text),
                OutputField::new("notes", "Notes", OutputKind::Text),
            ]
        });
        &FIELDS
    }

    fn role_prompt(&self) -> &str {
        "You read prescriptions. Extract only what is written. Each entry of \
         \"medications\" is an object with \"name\", \"dosage\", \"frequency\", \
         \"duration\" and \"instructions\"; use null for anything not stated."
    }

    fn template(&self) -> &str {
        "<prescription>\n{{ prescriptionText }}\n</prescription>"
    }
}

#[derive(Deserialize)]
struct ReaderView {
    #[serde(default)]
    medications: Option<Vec<MedicationEntry>>,
    #[serde(default)]
    prescriber: Option<String>,
}

/// Build a [`Prescription`] from a reader reply.
///
/// `None` when no medication could be read, including when the entries are
/// not objects with at least a `name`.
pub fn to_prescription(payload: &SuccessPayload) -> Option<Prescription> {
    let view: ReaderView = payload.decode().ok()?;
    let medications: Vec<MedicationEntry> = view
        .medications?
        .into_iter()
        .filter(|m| !m.name.trim().is_empty())
        .collect();
    if medications.is_empty() {
        return None;
    }

    Some(Prescription {
        medications,
        prescriber: view.prescriber,
        parsed_at: jiff::Timestamp::now(),
    })
}
