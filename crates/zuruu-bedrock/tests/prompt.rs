use serde_json::json;
use zuruu_bedrock::prompt::{render_instruction, system_prompt};
use zuruu_flows::Flow;
use zuruu_flows::flows::clinical_case::EvaluateCase;
use zuruu_flows::flows::dose_calculator::DoseCalculator;
use zuruu_flows::flows::emergency::EmergencyAssistance;
use zuruu_flows::get_flow;

#[test]
fn optional_fields_are_left_out_of_the_instruction() {
    let raw = json!({ "drugName": "Vancomycin", "patientWeightKg": "80" });
    let input = DoseCalculator.validate(raw.as_object().unwrap()).unwrap();

    let text = render_instruction(&DoseCalculator, &input).unwrap();
    assert!(text.starts_with("Calculate a dose of Vancomycin for a patient weighing 80"));
    assert!(!text.contains("Indication"));
    assert!(!text.contains("Renal function"));
}

#[test]
fn false_and_zero_values_still_render() {
    let raw = json!({ "situation": "Infant choking", "patientAgeYears": 0, "isConscious": "no" });
    let input = EmergencyAssistance.validate(raw.as_object().unwrap()).unwrap();

    let text = render_instruction(&EmergencyAssistance, &input).unwrap();
    assert!(text.contains("Age: 0"));
    assert!(text.contains("Conscious: false"));
}

#[test]
fn evaluate_template_lists_answers_in_order() {
    let raw = json!({
        "topic": "Hypertension",
        "caseDetails": { "patientProfile": "58-year-old man" },
        "studentAnswers": ["Lifestyle changes", "Start an ACE inhibitor"],
    });
    let input = EvaluateCase.validate(raw.as_object().unwrap()).unwrap();

    let text = render_instruction(&EvaluateCase, &input).unwrap();
    assert!(text.contains("58-year-old man"));
    assert!(text.contains("1. Lifestyle changes"));
    assert!(text.contains("2. Start an ACE inhibitor"));
}

#[test]
fn every_catalog_template_parses() {
    for flow in zuruu_flows::all_flows() {
        let mut tera = tera::Tera::default();
        assert!(
            tera.add_raw_template(flow.id(), flow.template()).is_ok(),
            "{} template does not parse",
            flow.id()
        );
    }
}

#[test]
fn system_prompt_lists_every_output_field() {
    let flow = get_flow("drug_interaction_checker").unwrap();
    let prompt = system_prompt(flow.as_ref());
    for field in flow.output_fields() {
        assert!(prompt.contains(&format!("\"{}\"", field.name)));
    }
}
