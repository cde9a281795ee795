use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;
use uuid::Uuid;

use zuruu_core::models::mode::Mode;
use zuruu_core::models::patient::PatientRecord;
use zuruu_core::models::prescription::Prescription;
use zuruu_core::redaction::RedactionPolicy;
use zuruu_session::store::{ActiveUser, SessionHandle, SessionState};

use crate::error::ApiError;
use crate::session::Session;
use crate::state::AppState;

/// Patient details as entered in the record form.
///
/// `id` is absent for a new record and present to edit an existing one.
#[derive(Debug, Deserialize)]
pub struct PatientForm {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub cnic: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
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
}

impl PatientForm {
    fn into_record(self) -> Result<PatientRecord, ApiError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ApiError::BadRequest("patient name is required".to_string()));
        }

        let mut record = PatientRecord::new(name);
        if let Some(id) = self.id {
            record.id = id;
        }
        record.age = self.age;
        record.gender = non_blank(self.gender);
        record.cnic = non_blank(self.cnic);
        record.phone = non_blank(self.phone);
        record.address = non_blank(self.address);
        record.presenting_complaint = non_blank(self.presenting_complaint);
        record.medical_history = non_blank(self.medical_history);
        record.medication_history = non_blank(self.medication_history);
        record.allergies = non_blank(self.allergies);
        record.lab_results = non_blank(self.lab_results);
        record.notes = non_blank(self.notes);
        Ok(record)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Deserialize)]
pub struct ModeBody {
    pub mode: Mode,
}

/// Either a stored record's id or an unsaved record.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ActiveUserBody {
    Linked { id: Uuid },
    Transient { record: PatientForm },
}

/// The session as the current mode may see it.
fn redacted_snapshot(session: &SessionHandle, policy: &RedactionPolicy) -> SessionState {
    let mut snapshot = session.snapshot();
    let mode = snapshot.mode;

    for record in &mut snapshot.patient_records {
        *record = policy.redact(mode, record);
    }
    if let Some(ActiveUser::Transient(record)) = &mut snapshot.active_user {
        *record = policy.redact(mode, record);
    }
    snapshot
}

pub async fn get_session(
    State(state): State<AppState>,
    Session(session): Session,
) -> Json<SessionState> {
    Json(redacted_snapshot(&session, &state.policy))
}

pub async fn set_mode(
    State(state): State<AppState>,
    Session(session): Session,
    Json(body): Json<ModeBody>,
) -> Json<SessionState> {
    session.set_mode(body.mode);
    Json(redacted_snapshot(&session, &state.policy))
}

// -- Patient records --

pub async fn list_patients(
    State(state): State<AppState>,
    Session(session): Session,
) -> Json<Vec<PatientRecord>> {
    Json(redacted_snapshot(&session, &state.policy).patient_records)
}

pub async fn save_patient(
    State(state): State<AppState>,
    Session(session): Session,
    Json(form): Json<PatientForm>,
) -> Result<Json<PatientRecord>, ApiError> {
    let id = session.add_or_update_patient_record(form.into_record()?);

    let saved = session
        .snapshot()
        .record(id)
        .cloned()
        .ok_or_else(|| ApiError::Internal(format!("patient {id} missing after save")))?;
    Ok(Json(state.policy.redact(session.mode(), &saved)))
}

pub async fn delete_patient(
    Session(session): Session,
    Path(id): Path<Uuid>,
) -> Result<Json<()>, ApiError> {
    session
        .remove_patient_record(id)
        .ok_or_else(|| ApiError::NotFound(format!("patient not found: {id}")))?;
    Ok(Json(()))
}

// -- Active user --

pub async fn set_active_user(
    State(state): State<AppState>,
    Session(session): Session,
    Json(body): Json<ActiveUserBody>,
) -> Result<Json<PatientRecord>, ApiError> {
    match body {
        ActiveUserBody::Linked { id } => session.set_active_user(id)?,
        ActiveUserBody::Transient { record } => session.set_transient_user(record.into_record()?),
    }
    redacted_active_patient(&session, &state.policy)
}

pub async fn clear_active_user(Session(session): Session) -> Json<()> {
    session.clear_active_user();
    Json(())
}

pub async fn active_patient(
    State(state): State<AppState>,
    Session(session): Session,
) -> Result<Json<PatientRecord>, ApiError> {
    redacted_active_patient(&session, &state.policy)
}

fn redacted_active_patient(
    session: &SessionHandle,
    policy: &RedactionPolicy,
) -> Result<Json<PatientRecord>, ApiError> {
    let record = session.require_active_patient()?;
    Ok(Json(policy.redact(session.mode(), &record)))
}

// -- Prescription hand-off --

pub async fn set_prescription(
    Session(session): Session,
    Json(prescription): Json<Prescription>,
) -> Json<()> {
    session.set_last_prescription(prescription);
    Json(())
}

pub async fn clear_prescription(Session(session): Session) -> Json<()> {
    session.clear_last_prescription();
    Json(())
}

/// Hand the waiting prescription to the caller; a second call finds nothing.
pub async fn consume_prescription(
    Session(session): Session,
) -> Result<Json<Prescription>, ApiError> {
    session
        .take_last_prescription()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("no prescription waiting".to_string()))
}
