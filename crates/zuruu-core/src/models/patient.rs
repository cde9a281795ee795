use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// A patient case history captured by the pharmacist or patient forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PatientRecord {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    /// National identity card number.
    #[serde(default)]
    pub cnic: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,

    // Free-text history
    #[serde(default)]
    pub presenting_complaint: Option<String>,
    #[serde(default)]
    pub medical_history: Option<String>,
    #[serde(default)]
    pub medication_history: Option<String>,
    #[serde(default)]
    pub allergies: Option<String>,
    #[serde(default)]
    pub lab_results: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,

    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

impl PatientRecord {
    /// A fresh record with a generated id and nothing but a name.
    pub fn new(name: impl Into<String>) -> Self {
        let now = jiff::Timestamp::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            age: None,
            gender: None,
            cnic: None,
            phone: None,
            address: None,
            presenting_complaint: None,
            medical_history: None,
            medication_history: None,
            allergies: None,
            lab_results: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Render a single field as display text, if it has a value.
    pub fn field_text(&self, field: PatientField) -> Option<String> {
        match field {
            PatientField::Name => Some(self.name.clone()),
            PatientField::Age => self.age.map(|a| a.to_string()),
            PatientField::Gender => self.gender.clone(),
            PatientField::Cnic => self.cnic.clone(),
            PatientField::Phone => self.phone.clone(),
            PatientField::Address => self.address.clone(),
            PatientField::PresentingComplaint => self.presenting_complaint.clone(),
            PatientField::MedicalHistory => self.medical_history.clone(),
            PatientField::MedicationHistory => self.medication_history.clone(),
            PatientField::Allergies => self.allergies.clone(),
            PatientField::LabResults => self.lab_results.clone(),
            PatientField::Notes => self.notes.clone(),
        }
        .filter(|v| !v.trim().is_empty())
    }

    /// Overwrite a field with a placeholder. Non-text fields are cleared.
    pub fn mask_field(&mut self, field: PatientField, placeholder: &str) {
        let slot = match field {
            PatientField::Name => {
                self.name = placeholder.to_string();
                return;
            }
            PatientField::Age => {
                self.age = None;
                return;
            }
            PatientField::Gender => &mut self.gender,
            PatientField::Cnic => &mut self.cnic,
            PatientField::Phone => &mut self.phone,
            PatientField::Address => &mut self.address,
            PatientField::PresentingComplaint => &mut self.presenting_complaint,
            PatientField::MedicalHistory => &mut self.medical_history,
            PatientField::MedicationHistory => &mut self.medication_history,
            PatientField::Allergies => &mut self.allergies,
            PatientField::LabResults => &mut self.lab_results,
            PatientField::Notes => &mut self.notes,
        };
        if slot.is_some() {
            *slot = Some(placeholder.to_string());
        }
    }
}

/// Addressable fields of a [`PatientRecord`], used by the redaction table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PatientField {
    Name,
    Age,
    Gender,
    Cnic,
    Phone,
    Address,
    PresentingComplaint,
    MedicalHistory,
    MedicationHistory,
    Allergies,
    LabResults,
    Notes,
}

impl PatientField {
    pub const ALL: [PatientField; 12] = [
        PatientField::Name,
        PatientField::Age,
        PatientField::Gender,
        PatientField::Cnic,
        PatientField::Phone,
        PatientField::Address,
        PatientField::PresentingComplaint,
        PatientField::MedicalHistory,
        PatientField::MedicationHistory,
        PatientField::Allergies,
        PatientField::LabResults,
        PatientField::Notes,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PatientField::Name => "Name",
            PatientField::Age => "Age",
            PatientField::Gender => "Gender",
            PatientField::Cnic => "CNIC",
            PatientField::Phone => "Phone",
            PatientField::Address => "Address",
            PatientField::PresentingComplaint => "Presenting complaint",
            PatientField::MedicalHistory => "Medical history",
            PatientField::MedicationHistory => "Medication history",
            PatientField::Allergies => "Allergies",
            PatientField::LabResults => "Lab results",
            PatientField::Notes => "Notes",
        }
    }
}
