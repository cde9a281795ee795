use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use zuruu_core::models::mode::Mode;
use zuruu_core::models::payload::FlowResponse;
use zuruu_flows::error::FlowError;
use zuruu_flows::flows::prescription_reader::{PrescriptionReader, to_prescription};
use zuruu_flows::shape::RawInput;
use zuruu_flows::{Flow, FlowDescriptor, all_flows, get_flow};

use crate::error::ApiError;
use crate::session::Session;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListParams {
    /// Only flows listed in this mode's menus.
    mode: Option<Mode>,
}

#[derive(Serialize)]
pub struct FlowSummary {
    id: String,
    name: String,
    description: String,
    audience: Vec<Mode>,
}

pub async fn list_flows(Query(params): Query<ListParams>) -> Json<Vec<FlowSummary>> {
    let flows: Vec<FlowSummary> = all_flows()
        .iter()
        .filter(|f| params.mode.is_none_or(|m| f.audience().contains(&m)))
        .map(|f| FlowSummary {
            id: f.id().to_string(),
            name: f.name().to_string(),
            description: f.description().to_string(),
            audience: f.audience().to_vec(),
        })
        .collect();
    Json(flows)
}

pub async fn get_flow_detail(Path(id): Path<String>) -> Result<Json<FlowDescriptor>, ApiError> {
    let flow = get_flow(&id).ok_or(FlowError::UnknownFlow(id))?;
    Ok(Json(flow.descriptor()))
}

/// Validate the body against the flow's shape and invoke it.
///
/// Invalid input is a 422 and the provider is never called. Once validated,
/// the response is always 200 with the flow's success or error payload.
pub async fn invoke_flow(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<String>,
    Json(raw): Json<RawInput>,
) -> Result<Json<FlowResponse>, ApiError> {
    let flow = get_flow(&id).ok_or(FlowError::UnknownFlow(id))?;
    let input = flow.validate(&raw)?;

    let response = if flow.uses_patient_context() {
        let record = session.require_active_patient()?;
        let redacted = state.policy.redact(session.mode(), &record);
        state
            .invoker
            .invoke_with_patient(flow.as_ref(), &input, &redacted)
            .await
    } else {
        state.invoker.invoke(flow.as_ref(), &input).await
    };

    if let FlowResponse::Success(payload) = &response
        && flow.id() == PrescriptionReader.id()
    {
        match to_prescription(payload) {
            Some(prescription) => {
                tracing::info!(
                    medications = prescription.medications.len(),
                    "stored last prescription"
                );
                session.set_last_prescription(prescription);
            }
            None => tracing::warn!("prescription reply had no readable medications"),
        }
    }

    Ok(Json(response))
}
