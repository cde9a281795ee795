use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A prescription parsed from an upload, waiting to be picked up by a
/// downstream tool (interaction checker, counseling, adherence).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Prescription {
    pub medications: Vec<MedicationEntry>,
    #[serde(default)]
    pub prescriber: Option<String>,
    pub parsed_at: jiff::Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MedicationEntry {
    pub name: String,
    #[serde(default)]
    pub dosage: Option<String>,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
}

impl Prescription {
    pub fn medication_names(&self) -> Vec<&str> {
        self.medications.iter().map(|m| m.name.as_str()).collect()
    }
}
