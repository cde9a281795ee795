use thiserror::Error;

/// Anything that can go wrong between a validated input and a payload.
///
/// Never leaves the invoker: it is logged and replaced by the generic
/// error payload.
#[derive(Debug, Error)]
pub enum BedrockError {
    #[error("model invocation failed: {0}")]
    Invocation(String),

    #[error("model invocation timed out")]
    Timeout,

    #[error("response parsing failed: {0}")]
    ResponseParse(String),

    #[error("response did not conform to expected schema: {0}")]
    SchemaViolation(String),

    #[error("instruction template failed: {0}")]
    Template(String),

    #[error("input validated for flow '{actual}' was sent to flow '{expected}'")]
    FlowMismatch { expected: String, actual: String },
}

impl From<tera::Error> for BedrockError {
    fn from(e: tera::Error) -> Self {
        BedrockError::Template(e.to_string())
    }
}
