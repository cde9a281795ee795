use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// The only message end users ever see when a flow fails.
pub const GENERIC_ERROR_MESSAGE: &str =
    "We couldn't complete this request right now. Please try again.";

/// The outcome of one flow invocation: a payload or a message, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "status", rename_all = "snake_case")]
#[ts(export)]
pub enum FlowResponse {
    Success(SuccessPayload),
    Error(ErrorPayload),
}

impl FlowResponse {
    pub fn generic_error() -> Self {
        FlowResponse::Error(ErrorPayload::generic())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FlowResponse::Success(_))
    }

    pub fn success(&self) -> Option<&SuccessPayload> {
        match self {
            FlowResponse::Success(p) => Some(p),
            FlowResponse::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorPayload> {
        match self {
            FlowResponse::Success(_) => None,
            FlowResponse::Error(e) => Some(e),
        }
    }

    pub fn into_result(self) -> Result<SuccessPayload, ErrorPayload> {
        match self {
            FlowResponse::Success(p) => Ok(p),
            FlowResponse::Error(e) => Err(e),
        }
    }
}

/// Structured output of a flow.
///
/// Holds only the declared output fields the provider actually returned.
/// Every field is optional: callers read through [`SuccessPayload::get`] or
/// decode into a view struct whose fields are all `Option<T>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SuccessPayload {
    pub flow_id: String,
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl SuccessPayload {
    pub fn new(flow_id: impl Into<String>, fields: BTreeMap<String, serde_json::Value>) -> Self {
        Self {
            flow_id: flow_id.into(),
            fields,
        }
    }

    /// A field's value, treating JSON `null` as absent.
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.fields.get(name).filter(|v| !v.is_null())
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.as_str())
    }

    /// String entries of a list field; non-string entries are skipped.
    pub fn get_strings(&self, name: &str) -> Option<Vec<String>> {
        self.get(name).and_then(|v| v.as_array()).map(|items| {
            items
                .iter()
                .filter_map(|i| i.as_str().map(str::to_string))
                .collect()
        })
    }

    pub fn is_empty(&self) -> bool {
        self.fields.values().all(|v| v.is_null())
    }

    /// Decode into a typed view. View structs should declare every field as
    /// `Option<T>` with `#[serde(default)]`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, CoreError> {
        let value = serde_json::to_value(&self.fields)?;
        Ok(serde_json::from_value(value)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorPayload {
    pub message: String,
}

impl ErrorPayload {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn generic() -> Self {
        Self::new(GENERIC_ERROR_MESSAGE)
    }
}
