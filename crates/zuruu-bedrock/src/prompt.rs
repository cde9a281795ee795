use tera::{Context, Tera};
use zuruu_core::models::patient::PatientRecord;
use zuruu_flows::Flow;
use zuruu_flows::shape::{ValidatedInput, output_instruction};

use crate::context::build_patient_context;
use crate::error::BedrockError;
use crate::provider::ProviderRequest;

/// Render the flow's instruction template with the validated input.
///
/// Template variables are the input field names; optional fields the user
/// left empty are undefined, so templates guard them with `{% if %}`.
pub fn render_instruction(flow: &dyn Flow, input: &ValidatedInput) -> Result<String, BedrockError> {
    let mut tera = Tera::default();
    tera.add_raw_template(flow.id(), flow.template())?;

    let context = Context::from_value(input.to_json())?;
    Ok(tera.render(flow.id(), &context)?)
}

/// The flow's fixed framing followed by the JSON reply contract.
pub fn system_prompt(flow: &dyn Flow) -> String {
    format!(
        "{}\n\n{}",
        flow.role_prompt(),
        output_instruction(flow.output_fields())
    )
}

/// Assemble the provider request, appending the patient block when given.
pub fn build_request(
    flow: &dyn Flow,
    input: &ValidatedInput,
    patient: Option<&PatientRecord>,
) -> Result<ProviderRequest, BedrockError> {
    let mut user_message = render_instruction(flow, input)?;

    if let Some(record) = patient {
        user_message.push_str("\n\n");
        user_message.push_str(&build_patient_context(record));
    }

    Ok(ProviderRequest {
        system_prompt: system_prompt(flow),
        user_message,
    })
}
