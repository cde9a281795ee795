use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use zuruu_bedrock::invoker::FlowInvoker;
use zuruu_bedrock::scripted::ScriptedProvider;
use zuruu_core::models::payload::GENERIC_ERROR_MESSAGE;
use zuruu_core::redaction::{REDACTED, RedactionPolicy};
use zuruu_lambda::router;
use zuruu_lambda::session::SESSION_HEADER;
use zuruu_lambda::state::AppState;
use zuruu_session::registry::SessionRegistry;
use zuruu_session::store::SessionHandle;

const SESSION_ID: &str = "test-session";

struct TestApp {
    provider: Arc<ScriptedProvider>,
    sessions: Arc<SessionRegistry>,
    router: Router,
}

impl TestApp {
    /// The session `send` talks to.
    fn session(&self) -> SessionHandle {
        self.sessions.handle(SESSION_ID).unwrap()
    }
}

fn app() -> TestApp {
    let provider = Arc::new(ScriptedProvider::new());
    let sessions = Arc::new(SessionRegistry::new());
    let state = AppState {
        invoker: FlowInvoker::new(provider.clone()),
        sessions: sessions.clone(),
        policy: Arc::new(RedactionPolicy::default()),
    };
    TestApp {
        provider,
        sessions,
        router: router(state),
    }
}

async fn send(app: &TestApp, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send_as(app, Some(SESSION_ID), method, uri, body).await
}

async fn send_as(
    app: &TestApp,
    session_id: Option<&str>,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(id) = session_id {
        builder = builder.header(SESSION_HEADER, id);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn catalog_lists_and_filters_by_mode() {
    let app = app();
    let (status, all) = send(&app, Method::GET, "/flows", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), zuruu_flows::all_flows().len());

    let (_, student) = send(&app, Method::GET, "/flows?mode=student", None).await;
    let ids: Vec<&str> = student
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"flashcard_generator"));
    assert!(!ids.contains(&"patient_counseling"));
}

#[tokio::test]
async fn flow_detail_and_unknown_flow() {
    let app = app();
    let (status, detail) = send(&app, Method::GET, "/flows/dose_calculator", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["input_shape"]["fields"][0]["name"], "drugName");

    let (status, body) = send(&app, Method::GET, "/flows/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("nope"));
}

#[tokio::test]
async fn invalid_input_is_422_and_never_invokes() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/flows/dose_calculator",
        Some(json!({ "drugName": "Gentamicin", "patientWeightKg": -5 })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"][0]["field"], "patientWeightKg");
    assert_eq!(body["fields"][0]["message"], "Must be positive");
    assert_eq!(app.provider.call_count(), 0);
}

#[tokio::test]
async fn success_is_tagged() {
    let app = app();
    app.provider
        .push_json(json!({ "interactions": ["Bleeding risk"], "severity": "major" }));

    let (status, body) = send(
        &app,
        Method::POST,
        "/flows/drug_interaction_checker",
        Some(json!({ "medications": "warfarin, aspirin" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["fields"]["severity"], "major");
    assert!(body.get("message").is_none());
}

#[tokio::test]
async fn provider_failure_is_generic_error_payload() {
    let app = app();
    app.provider.push_reply("<html>502 Bad Gateway</html>");

    let (status, body) = send(
        &app,
        Method::POST,
        "/flows/allergy_checker",
        Some(json!({ "medication": "Cefalexin", "knownAllergies": ["penicillin"] })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "error", "message": GENERIC_ERROR_MESSAGE }));
}

#[tokio::test]
async fn patient_flow_without_active_patient_is_409_with_redirect() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/flows/patient_counseling",
        Some(json!({ "medication": "Metformin" })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["redirect"], "/patient-records");
    assert_eq!(app.provider.call_count(), 0);
}

#[tokio::test]
async fn patient_flow_sends_redacted_context() {
    let app = app();
    app.provider.push_json(json!({ "keyPoints": ["Take with meals"] }));

    let (status, saved) = send(
        &app,
        Method::POST,
        "/session/patients",
        Some(json!({
            "name": "Ayesha Khan",
            "cnic": "35202-1234567-1",
            "allergies": "Sulfa drugs",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    // Pharmacist mode by default: CNIC hidden, name visible.
    assert_eq!(saved["cnic"], REDACTED);
    assert_eq!(saved["name"], "Ayesha Khan");

    let id = saved["id"].as_str().unwrap().to_string();
    let (status, _) = send(&app, Method::PUT, "/session/active-user", Some(json!({ "id": id }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::POST,
        "/flows/patient_counseling",
        Some(json!({ "medication": "Metformin" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");

    let message = &app.provider.calls()[0].user_message;
    assert!(message.contains("Allergies: Sulfa drugs"));
    assert!(!message.contains("35202"));

    // The stored record itself is untouched.
    let stored = app.session().patient_records();
    assert_eq!(stored[0].cnic.as_deref(), Some("35202-1234567-1"));
}

#[tokio::test]
async fn student_mode_hides_identifiers() {
    let app = app();
    send(&app, Method::POST, "/session/patients", Some(json!({ "name": "Ayesha Khan", "phone": "0300" }))).await;
    let (status, _) = send(&app, Method::PUT, "/session/mode", Some(json!({ "mode": "student" }))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, records) = send(&app, Method::GET, "/session/patients", None).await;
    assert_eq!(records[0]["name"], REDACTED);
    assert_eq!(records[0]["phone"], REDACTED);
}

#[tokio::test]
async fn unknown_active_user_is_409_and_clears() {
    let app = app();
    let (status, _) = send(
        &app,
        Method::PUT,
        "/session/active-user",
        Some(json!({ "id": uuid::Uuid::new_v4() })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, Method::GET, "/session/active-patient", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(app.session().get_active_patient_record().is_none());
}

#[tokio::test]
async fn deleting_active_patient_clears_it() {
    let app = app();
    let (_, saved) = send(&app, Method::POST, "/session/patients", Some(json!({ "name": "Bilal" }))).await;
    let id = saved["id"].as_str().unwrap().to_string();
    send(&app, Method::PUT, "/session/active-user", Some(json!({ "id": id }))).await;

    let (status, _) = send(&app, Method::DELETE, &format!("/session/patients/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(app.session().snapshot().active_user.is_none());

    let (status, _) = send(&app, Method::DELETE, &format!("/session/patients/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_patient_name_is_rejected() {
    let app = app();
    let (status, _) = send(&app, Method::POST, "/session/patients", Some(json!({ "name": "  " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(app.session().patient_records().is_empty());
}

#[tokio::test]
async fn prescription_reader_hands_off_prescription() {
    let app = app();
    app.provider.push_json(json!({
        "medications": [{ "name": "Amoxicillin", "dosage": "500 mg", "frequency": "TDS" }],
    }));

    let (status, body) = send(
        &app,
        Method::POST,
        "/flows/prescription_reader",
        Some(json!({ "prescriptionText": "Amoxicillin 500 mg TDS x 5 days" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");

    let (status, prescription) = send(&app, Method::POST, "/session/prescription/consume", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(prescription["medications"][0]["name"], "Amoxicillin");

    let (status, _) = send(&app, Method::POST, "/session/prescription/consume", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn local_tools() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/tools/convert",
        Some(json!({ "value": 500, "from": "mg", "to": "g" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], 0.5);

    let (status, _) = send(
        &app,
        Method::POST,
        "/tools/convert",
        Some(json!({ "value": 5, "from": "mg", "to": "mL" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::POST,
        "/tools/adherence",
        Some(json!({
            "totalUnits": 30,
            "unitsPerDose": 1,
            "dosesPerDay": 2,
            "startDate": "2025-03-01",
            "asOf": "2025-03-06",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["unitsRemaining"], 20.0);
    assert_eq!(app.provider.call_count(), 0);
}

#[tokio::test]
async fn adherence_supply_past_the_calendar_is_400() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/tools/adherence",
        Some(json!({
            "totalUnits": 1_000_000_000,
            "unitsPerDose": 1,
            "dosesPerDay": 1,
            "startDate": "2025-03-01",
            "asOf": "2025-03-06",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("date arithmetic"));
}

#[tokio::test]
async fn sessions_do_not_see_each_other() {
    let app = app();
    let (status, saved) = send_as(
        &app,
        Some("clinic-a"),
        Method::POST,
        "/session/patients",
        Some(json!({ "name": "Ayesha", "phone": "0300-1234567" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = saved["id"].as_str().unwrap().to_string();
    send_as(&app, Some("clinic-a"), Method::PUT, "/session/active-user", Some(json!({ "id": id }))).await;

    let (status, records) = send_as(&app, Some("clinic-b"), Method::GET, "/session/patients", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(records, json!([]));

    // B cannot select A's record or act on A's active patient.
    let (status, _) = send_as(&app, Some("clinic-b"), Method::PUT, "/session/active-user", Some(json!({ "id": id }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = send_as(&app, Some("clinic-b"), Method::DELETE, &format!("/session/patients/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, active) = send_as(&app, Some("clinic-a"), Method::GET, "/session/active-patient", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(active["name"], "Ayesha");
}

#[tokio::test]
async fn session_routes_require_a_session_id() {
    let app = app();
    let (status, body) = send_as(&app, None, Method::GET, "/session/patients", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains(SESSION_HEADER));

    let (status, _) = send_as(&app, Some("has space"), Method::GET, "/session", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_as(
        &app,
        None,
        Method::POST,
        "/flows/drug_interaction_checker",
        Some(json!({ "medications": "warfarin, aspirin" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.provider.call_count(), 0);
    assert!(app.sessions.is_empty());
}
