use std::sync::Arc;

use tracing::{error, info};
use uuid::Uuid;
use zuruu_core::models::patient::PatientRecord;
use zuruu_core::models::payload::{FlowResponse, SuccessPayload};
use zuruu_core::models::usage::TokenUsage;
use zuruu_flows::Flow;
use zuruu_flows::shape::{ValidatedInput, conform_output};

use crate::error::BedrockError;
use crate::provider::ReasoningProvider;
use crate::{extract, prompt};

/// Runs flows against a reasoning provider.
///
/// [`FlowInvoker::invoke`] always resolves to a [`FlowResponse`]. Every
/// failure (template, provider, timeout, unparseable or off-schema reply)
/// is logged with its cause and replaced by the generic error payload.
/// One provider call per invocation; nothing is retried or cached.
#[derive(Clone)]
pub struct FlowInvoker {
    provider: Arc<dyn ReasoningProvider>,
}

impl FlowInvoker {
    pub fn new(provider: Arc<dyn ReasoningProvider>) -> Self {
        Self { provider }
    }

    pub async fn invoke(&self, flow: &dyn Flow, input: &ValidatedInput) -> FlowResponse {
        self.run(flow, input, None).await
    }

    /// Invoke with a patient context block appended. `patient` should already
    /// be redacted for the caller's mode.
    pub async fn invoke_with_patient(
        &self,
        flow: &dyn Flow,
        input: &ValidatedInput,
        patient: &PatientRecord,
    ) -> FlowResponse {
        self.run(flow, input, Some(patient)).await
    }

    async fn run(
        &self,
        flow: &dyn Flow,
        input: &ValidatedInput,
        patient: Option<&PatientRecord>,
    ) -> FlowResponse {
        let invocation_id = Uuid::new_v4();
        info!(invocation_id = %invocation_id, flow_id = flow.id(), "invoking flow");

        match self.try_invoke(flow, input, patient, invocation_id).await {
            Ok(payload) => {
                info!(
                    invocation_id = %invocation_id,
                    flow_id = flow.id(),
                    fields = payload.fields.len(),
                    "flow invocation complete"
                );
                FlowResponse::Success(payload)
            }
            Err(e) => {
                error!(
                    invocation_id = %invocation_id,
                    flow_id = flow.id(),
                    error = %e,
                    "flow invocation failed"
                );
                FlowResponse::generic_error()
            }
        }
    }

    async fn try_invoke(
        &self,
        flow: &dyn Flow,
        input: &ValidatedInput,
        patient: Option<&PatientRecord>,
        invocation_id: Uuid,
    ) -> Result<SuccessPayload, BedrockError> {
        if input.flow_id() != flow.id() {
            return Err(BedrockError::FlowMismatch {
                expected: flow.id().to_string(),
                actual: input.flow_id().to_string(),
            });
        }

        let request = prompt::build_request(flow, input, patient)?;
        let reply = self.provider.complete(&request).await?;

        let usage = TokenUsage::new(&reply.model_id, reply.tokens);
        info!(
            invocation_id = %invocation_id,
            model_id = %usage.model_id,
            input_tokens = usage.tokens.input,
            output_tokens = usage.tokens.output,
            cost_usd = ?usage.cost_usd,
            "provider usage"
        );

        let value = extract::extract_json(&reply.text)?;
        let fields = conform_output(flow.output_fields(), &value)
            .map_err(|e| BedrockError::SchemaViolation(e.to_string()))?;

        Ok(SuccessPayload::new(flow.id(), fields))
    }
}
