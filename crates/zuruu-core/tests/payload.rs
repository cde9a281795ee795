use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::json;
use zuruu_core::models::payload::{
    ErrorPayload, FlowResponse, GENERIC_ERROR_MESSAGE, SuccessPayload,
};

fn payload() -> SuccessPayload {
    let mut fields = BTreeMap::new();
    fields.insert("recommended_dose".to_string(), json!("500 mg every 8 hours"));
    fields.insert("warnings".to_string(), json!(["Take with food", 3]));
    fields.insert("max_daily_dose".to_string(), serde_json::Value::Null);
    SuccessPayload::new("dose_calculator", fields)
}

#[test]
fn success_serializes_with_status_tag() {
    let response = FlowResponse::Success(payload());
    let value = serde_json::to_value(&response).unwrap();

    assert_eq!(value["status"], "success");
    assert_eq!(value["flow_id"], "dose_calculator");
    assert!(value.get("message").is_none());
}

#[test]
fn error_serializes_with_message_only() {
    let value = serde_json::to_value(FlowResponse::generic_error()).unwrap();

    assert_eq!(value["status"], "error");
    assert_eq!(value["message"], GENERIC_ERROR_MESSAGE);
    assert!(value.get("fields").is_none());
}

#[test]
fn variants_are_exclusive() {
    let ok = FlowResponse::Success(payload());
    assert!(ok.success().is_some() && ok.error().is_none());

    let err = FlowResponse::Error(ErrorPayload::new("nope"));
    assert!(err.success().is_none() && err.error().is_some());
}

#[test]
fn null_fields_read_as_absent() {
    let p = payload();
    assert!(p.get("max_daily_dose").is_none());
    assert!(p.get("missing").is_none());
    assert_eq!(p.get_str("recommended_dose"), Some("500 mg every 8 hours"));
    assert_eq!(p.get_strings("warnings"), Some(vec!["Take with food".to_string()]));
}

#[derive(Debug, Deserialize)]
struct DoseView {
    #[serde(default)]
    recommended_dose: Option<String>,
    #[serde(default)]
    max_daily_dose: Option<String>,
    #[serde(default)]
    monitoring: Option<Vec<String>>,
}

#[test]
fn decode_into_optional_view() {
    let view: DoseView = payload().decode().unwrap();
    assert_eq!(view.recommended_dose.as_deref(), Some("500 mg every 8 hours"));
    assert!(view.max_daily_dose.is_none());
    assert!(view.monitoring.is_none());
}

#[test]
fn deserializes_tagged_error() {
    let response: FlowResponse =
        serde_json::from_value(json!({ "status": "error", "message": "try later" })).unwrap();
    assert_eq!(response.into_result().unwrap_err().message, "try later");
}
