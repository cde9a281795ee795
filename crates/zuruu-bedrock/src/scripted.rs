//! An in-memory provider that replays queued replies.
//!
//! Used by tests across the workspace and handy for running the API
//! without AWS credentials.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use zuruu_core::models::usage::TokenCount;

use crate::error::BedrockError;
use crate::provider::{ProviderReply, ProviderRequest, ReasoningProvider};

pub const SCRIPTED_MODEL_ID: &str = "scripted";

#[derive(Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, BedrockError>>>,
    calls: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw reply text.
    pub fn push_reply(&self, text: impl Into<String>) -> &Self {
        self.lock_replies().push_back(Ok(text.into()));
        self
    }

    /// Queue a reply that is `value` serialized as JSON.
    pub fn push_json(&self, value: serde_json::Value) -> &Self {
        self.push_reply(value.to_string())
    }

    /// Queue a failure.
    pub fn push_failure(&self, error: BedrockError) -> &Self {
        self.lock_replies().push_back(Err(error));
        self
    }

    /// Every request received so far, oldest first.
    pub fn calls(&self) -> Vec<ProviderRequest> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn lock_replies(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<String, BedrockError>>> {
        self.replies.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ReasoningProvider for ScriptedProvider {
    async fn complete(&self, request: &ProviderRequest) -> Result<ProviderReply, BedrockError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        let next = self.lock_replies().pop_front().unwrap_or_else(|| {
            Err(BedrockError::Invocation("no scripted reply queued".to_string()))
        });

        next.map(|text| ProviderReply {
            text,
            model_id: SCRIPTED_MODEL_ID.to_string(),
            tokens: TokenCount::default(),
        })
    }
}
