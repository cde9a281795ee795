use thiserror::Error;
use uuid::Uuid;
use zuruu_core::models::payload::ErrorPayload;
use zuruu_flows::shape::FieldErrors;

use crate::orchestrator::Step;

/// Where the UI sends the user to fix a missing patient.
pub const PATIENT_RECORDS_ROUTE: &str = "/patient-records";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("No patient is selected. Choose or add a patient record first.")]
    NoActivePatient,

    #[error("Patient record {0} was not found. Choose a patient from your records.")]
    UnknownPatient(Uuid),
}

impl StateError {
    /// Route that resolves the problem.
    pub fn redirect(&self) -> &'static str {
        match self {
            StateError::NoActivePatient | StateError::UnknownPatient(_) => PATIENT_RECORDS_ROUTE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionIdError {
    #[error("session id is empty")]
    Empty,

    #[error("session id is longer than {max} characters")]
    TooLong { max: usize },

    #[error("session id may only contain letters, digits, '-', '_' and '.'")]
    InvalidCharacters,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("a request is already in progress")]
    AlreadyPending,

    #[error(transparent)]
    Invalid(#[from] FieldErrors),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TwoStepError {
    #[error("cannot {operation} while {step:?}")]
    InvalidState { operation: &'static str, step: Step },

    #[error("answer {index} is out of range for {questions} questions")]
    AnswerOutOfRange { index: usize, questions: usize },

    #[error(transparent)]
    Invalid(#[from] FieldErrors),

    #[error("{}", .0.message)]
    Flow(ErrorPayload),
}
