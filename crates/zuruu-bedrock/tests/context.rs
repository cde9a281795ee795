use zuruu_bedrock::context::build_patient_context;
use zuruu_core::models::mode::Mode;
use zuruu_core::models::patient::PatientRecord;
use zuruu_core::redaction::RedactionPolicy;

fn record() -> PatientRecord {
    let mut r = PatientRecord::new("Sana Iqbal");
    r.age = Some(37);
    r.cnic = Some("42101-7654321-0".to_string());
    r.medication_history = Some("Levothyroxine 50 mcg\n".to_string());
    r
}

#[test]
fn block_lists_non_empty_fields() {
    let block = build_patient_context(&record());
    assert!(block.starts_with("<patient_context>"));
    assert!(block.ends_with("</patient_context>"));
    assert!(block.contains("Name: Sana Iqbal\n"));
    assert!(block.contains("Age: 37\n"));
    assert!(block.contains("Medication history: Levothyroxine 50 mcg\n"));
    assert!(!block.contains("Phone"));
}

#[test]
fn redacted_record_keeps_identifiers_out() {
    let redacted = RedactionPolicy::default().redact(Mode::Student, &record());
    let block = build_patient_context(&redacted);
    assert!(!block.contains("Sana Iqbal"));
    assert!(!block.contains("42101"));
    assert!(block.contains("Levothyroxine"));
}
