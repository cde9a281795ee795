//! Render state of one flow form.
//!
//! `Idle -> Pending -> {Success, Error}`, and from either outcome a new
//! submit goes back to `Pending`. Submitting is refused while a request is
//! pending, so a form never has two calls in flight.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use zuruu_bedrock::invoker::FlowInvoker;
use zuruu_core::models::patient::PatientRecord;
use zuruu_core::models::payload::{ErrorPayload, FlowResponse, SuccessPayload};
use zuruu_flows::Flow;
use zuruu_flows::shape::{FieldErrors, OutputField, RawInput};

use crate::error::FormError;

/// Identifies one submission. A result carrying an older ticket is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum PresenterState {
    Idle,
    Pending { ticket: Ticket },
    Success(SuccessPayload),
    Error(ErrorPayload),
}

/// What the form's result area shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    Placeholder,
    Loading,
    Sections { sections: Vec<Section> },
    Alert { message: String },
}

/// One labelled output field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub name: String,
    pub label: String,
    pub value: Value,
}

#[derive(Debug, Clone)]
pub struct ResultPresenter {
    state: PresenterState,
    output_fields: Vec<OutputField>,
    issued: u64,
}

impl ResultPresenter {
    pub fn new(output_fields: &[OutputField]) -> Self {
        Self {
            state: PresenterState::Idle,
            output_fields: output_fields.to_vec(),
            issued: 0,
        }
    }

    pub fn state(&self) -> &PresenterState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, PresenterState::Pending { .. })
    }

    /// The submit control is disabled while a request is pending.
    pub fn submit_enabled(&self) -> bool {
        !self.is_pending()
    }

    /// Enter `Pending` for a new submission.
    pub fn begin(&mut self) -> Result<Ticket, FormError> {
        if self.is_pending() {
            return Err(FormError::AlreadyPending);
        }
        self.issued += 1;
        let ticket = Ticket(self.issued);
        self.state = PresenterState::Pending { ticket };
        Ok(ticket)
    }

    /// Record the outcome of the submission `ticket`.
    ///
    /// Returns `false` and leaves the state alone when `ticket` is not the
    /// one currently pending.
    pub fn resolve(&mut self, ticket: Ticket, response: FlowResponse) -> bool {
        match self.state {
            PresenterState::Pending { ticket: current } if current == ticket => {
                self.state = match response {
                    FlowResponse::Success(payload) => PresenterState::Success(payload),
                    FlowResponse::Error(error) => PresenterState::Error(error),
                };
                true
            }
            _ => {
                debug!(ticket = ticket.0, "discarding stale result");
                false
            }
        }
    }

    pub fn view(&self) -> View {
        match &self.state {
            PresenterState::Idle => View::Placeholder,
            PresenterState::Pending { .. } => View::Loading,
            PresenterState::Success(payload) => View::Sections {
                sections: self
                    .output_fields
                    .iter()
                    .filter_map(|field| {
                        payload.get(&field.name).map(|value| Section {
                            name: field.name.clone(),
                            label: field.label.clone(),
                            value: value.clone(),
                        })
                    })
                    .collect(),
            },
            PresenterState::Error(error) => View::Alert {
                message: error.message.clone(),
            },
        }
    }
}

/// A flow's form: the entered input, its last validation errors, and the
/// presenter for its result.
///
/// Entered input survives errors so the user can correct and resubmit.
pub struct FormController {
    flow: Arc<dyn Flow>,
    input: RawInput,
    field_errors: Option<FieldErrors>,
    presenter: ResultPresenter,
}

impl FormController {
    pub fn new(flow: Arc<dyn Flow>) -> Self {
        let presenter = ResultPresenter::new(flow.output_fields());
        Self {
            flow,
            input: RawInput::new(),
            field_errors: None,
            presenter,
        }
    }

    pub fn flow(&self) -> &dyn Flow {
        self.flow.as_ref()
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<Value>) {
        self.input.insert(name.to_string(), value.into());
    }

    pub fn input(&self) -> &RawInput {
        &self.input
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        self.field_errors.as_ref()
    }

    pub fn presenter(&self) -> &ResultPresenter {
        &self.presenter
    }

    /// Validate, invoke and record the result.
    ///
    /// Invalid input is reported per field; the presenter stays where it
    /// was and the invoker is not called.
    pub async fn submit(&mut self, invoker: &FlowInvoker) -> Result<&PresenterState, FormError> {
        self.run(invoker, None).await
    }

    /// Like [`FormController::submit`], with the (already redacted) active
    /// patient appended to the request.
    pub async fn submit_with_patient(
        &mut self,
        invoker: &FlowInvoker,
        patient: &PatientRecord,
    ) -> Result<&PresenterState, FormError> {
        self.run(invoker, Some(patient)).await
    }

    async fn run(
        &mut self,
        invoker: &FlowInvoker,
        patient: Option<&PatientRecord>,
    ) -> Result<&PresenterState, FormError> {
        if self.presenter.is_pending() {
            return Err(FormError::AlreadyPending);
        }

        let validated = match self.flow.validate(&self.input) {
            Ok(validated) => validated,
            Err(errors) => {
                self.field_errors = Some(errors.clone());
                return Err(FormError::Invalid(errors));
            }
        };
        self.field_errors = None;

        let ticket = self.presenter.begin()?;
        let response = match patient {
            Some(record) => {
                invoker
                    .invoke_with_patient(self.flow.as_ref(), &validated, record)
                    .await
            }
            None => invoker.invoke(self.flow.as_ref(), &validated).await,
        };
        self.presenter.resolve(ticket, response);

        Ok(self.presenter.state())
    }
}
