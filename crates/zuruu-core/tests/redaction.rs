use zuruu_core::error::CoreError;
use zuruu_core::models::mode::Mode;
use zuruu_core::models::patient::{PatientField, PatientRecord};
use zuruu_core::redaction::{REDACTED, RedactionPolicy};

fn record() -> PatientRecord {
    let mut r = PatientRecord::new("Ayesha Khan");
    r.age = Some(54);
    r.cnic = Some("35202-1234567-1".to_string());
    r.phone = Some("0300-1234567".to_string());
    r.medical_history = Some("Type 2 diabetes".to_string());
    r
}

#[test]
fn default_policy_hides_identifiers_from_students() {
    let policy = RedactionPolicy::default();
    let redacted = policy.redact(Mode::Student, &record());

    assert_eq!(redacted.name, REDACTED);
    assert_eq!(redacted.cnic.as_deref(), Some(REDACTED));
    assert_eq!(redacted.phone.as_deref(), Some(REDACTED));
    assert_eq!(redacted.medical_history.as_deref(), Some("Type 2 diabetes"));
    assert_eq!(redacted.age, Some(54));
    // Absent fields stay absent rather than becoming placeholders.
    assert!(redacted.address.is_none());
}

#[test]
fn default_policy_hides_cnic_from_pharmacists_only() {
    let policy = RedactionPolicy::default();
    let redacted = policy.redact(Mode::Pharmacist, &record());

    assert_eq!(redacted.name, "Ayesha Khan");
    assert_eq!(redacted.cnic.as_deref(), Some(REDACTED));
    assert_eq!(redacted.phone.as_deref(), Some("0300-1234567"));
}

#[test]
fn patient_mode_sees_everything() {
    let policy = RedactionPolicy::default();
    let r = record();
    assert_eq!(policy.redact(Mode::Patient, &r), r);
    assert_eq!(policy.visible_fields(Mode::Patient).len(), PatientField::ALL.len());
}

#[test]
fn table_is_editable() {
    let mut policy = RedactionPolicy::permissive();
    policy.hide(Mode::Student, PatientField::Age);
    assert!(policy.is_hidden(Mode::Student, PatientField::Age));
    assert!(policy.redact(Mode::Student, &record()).age.is_none());

    policy.show(Mode::Student, PatientField::Age);
    assert!(!policy.is_hidden(Mode::Student, PatientField::Age));
}

#[test]
fn round_trips_through_json() {
    let policy = RedactionPolicy::default();
    let json = policy.to_json_string().unwrap();
    assert_eq!(RedactionPolicy::from_json_str(&json).unwrap(), policy);
}

#[test]
fn migrates_pre_versioned_documents() {
    let legacy = r#"{ "redact": { "student": ["cnic", "phone"] } }"#;
    let policy = RedactionPolicy::from_json_str(legacy).unwrap();

    assert_eq!(policy.policy_version, 1);
    assert!(policy.is_hidden(Mode::Student, PatientField::Cnic));
    assert!(policy.is_hidden(Mode::Student, PatientField::Phone));
    assert!(!policy.is_hidden(Mode::Pharmacist, PatientField::Cnic));
}

#[test]
fn rejects_newer_versions() {
    let err = RedactionPolicy::from_json_str(r#"{ "policy_version": 9 }"#).unwrap_err();
    assert!(matches!(
        err,
        CoreError::UnsupportedPolicyVersion { found: 9, supported: 1 }
    ));
}

#[test]
fn versions_beyond_u32_are_not_wrapped() {
    let err = RedactionPolicy::from_json_str(r#"{ "policy_version": 4294967297 }"#).unwrap_err();
    assert!(matches!(
        err,
        CoreError::UnsupportedPolicyVersion {
            found: 4_294_967_297,
            supported: 1
        }
    ));
}

#[test]
fn non_numeric_versions_are_invalid() {
    for doc in [r#"{ "policy_version": -1 }"#, r#"{ "policy_version": "1" }"#] {
        let err = RedactionPolicy::from_json_str(doc).unwrap_err();
        assert!(matches!(err, CoreError::InvalidPolicy(_)));
    }
}
