use std::collections::HashSet;

use serde_json::json;
use zuruu_core::models::mode::Mode;
use zuruu_flows::flows::two_step;
use zuruu_flows::{all_flows, get_flow};

#[test]
fn flow_ids_are_unique() {
    let flows = all_flows();
    let ids: HashSet<String> = flows.iter().map(|f| f.id().to_string()).collect();
    assert_eq!(ids.len(), flows.len());
}

#[test]
fn lookup_by_id() {
    assert_eq!(get_flow("allergy_checker").unwrap().name(), "Allergy Checker");
    assert!(get_flow("nonexistent").is_none());
}

#[test]
fn every_flow_declares_outputs_and_a_required_field() {
    for flow in all_flows() {
        assert!(!flow.output_fields().is_empty(), "{} has no outputs", flow.id());
        assert!(
            flow.input_shape().fields.iter().any(|f| f.required),
            "{} has no required input",
            flow.id()
        );
        assert!(!flow.audience().is_empty(), "{} is in no menu", flow.id());
    }
}

#[test]
fn empty_input_fails_for_every_flow() {
    for flow in all_flows() {
        let errors = flow.validate(&Default::default()).unwrap_err();
        assert!(!errors.is_empty(), "{} accepted empty input", flow.id());
    }
}

#[test]
fn simulators_share_two_step_shapes() {
    for (generate, evaluate) in [
        ("clinical_case_generate", "clinical_case_evaluate"),
        ("osce_station_generate", "osce_station_evaluate"),
    ] {
        let generate = get_flow(generate).unwrap();
        let evaluate = get_flow(evaluate).unwrap();

        assert_eq!(generate.input_shape(), &two_step::generate_shape());
        assert_eq!(evaluate.input_shape(), &two_step::evaluate_shape());
        assert_eq!(evaluate.template(), two_step::EVALUATE_TEMPLATE);
    }
}

#[test]
fn evaluate_step_accepts_object_case_details() {
    let evaluate = get_flow("clinical_case_evaluate").unwrap();
    let raw = json!({
        "topic": "Hypertension",
        "caseDetails": { "patientProfile": "58M" },
        "studentAnswers": ["Start amlodipine"],
    });
    let input = evaluate.validate(raw.as_object().unwrap()).unwrap();
    assert!(input.get(two_step::CASE_DETAILS).is_some());
}

#[test]
fn only_counseling_needs_patient_context() {
    let with_context: Vec<String> = all_flows()
        .into_iter()
        .filter(|f| f.uses_patient_context())
        .map(|f| f.id().to_string())
        .collect();
    assert_eq!(with_context, ["patient_counseling"]);
}

#[test]
fn descriptor_mirrors_flow() {
    let flow = get_flow("flashcard_generator").unwrap();
    let descriptor = flow.descriptor();
    assert_eq!(descriptor.id, "flashcard_generator");
    assert_eq!(descriptor.audience, vec![Mode::Student]);
    assert_eq!(descriptor.input_shape.fields.len(), 3);

    let value = serde_json::to_value(&descriptor).unwrap();
    assert_eq!(value["input_shape"]["fields"][1]["kind"]["type"], "integer");
}

#[test]
fn reader_reply_becomes_prescription() {
    use std::collections::BTreeMap;
    use zuruu_core::models::payload::SuccessPayload;
    use zuruu_flows::flows::prescription_reader::to_prescription;

    let mut fields = BTreeMap::new();
    fields.insert(
        "medications".to_string(),
        json!([
            { "name": "Amoxicillin", "dosage": "500 mg", "frequency": "TDS", "duration": null },
            { "name": "  " },
        ]),
    );
    fields.insert("prescriber".to_string(), json!("Dr. Khan"));
    let payload = SuccessPayload::new("prescription_reader", fields);

    let prescription = to_prescription(&payload).unwrap();
    assert_eq!(prescription.medication_names(), ["Amoxicillin"]);
    assert_eq!(prescription.medications[0].dosage.as_deref(), Some("500 mg"));
    assert_eq!(prescription.prescriber.as_deref(), Some("Dr. Khan"));

    let mut fields = BTreeMap::new();
    fields.insert("medications".to_string(), json!(["Amoxicillin 500 mg"]));
    assert!(to_prescription(&SuccessPayload::new("prescription_reader", fields)).is_none());
}
