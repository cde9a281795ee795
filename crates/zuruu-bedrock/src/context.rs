//! Patient context block for flows that read the active patient.
//!
//! The caller redacts the record for the current mode before it gets here;
//! this module renders whatever it is given.

use zuruu_core::models::patient::{PatientField, PatientRecord};

/// Build an XML-style block listing every non-empty field of `record`.
pub fn build_patient_context(record: &PatientRecord) -> String {
    let mut block = String::from("<patient_context>\n");

    for field in PatientField::ALL {
        if let Some(value) = record.field_text(field) {
            block.push_str(&format!("{}: {}\n", field.label(), value.trim()));
        }
    }

    block.push_str("</patient_context>");
    block
}
