//! The reasoning provider seam.
//!
//! Flows never talk to Bedrock directly; they go through
//! [`ReasoningProvider`], which takes one system prompt and one user
//! message and returns the reply text. Tests swap in
//! [`crate::scripted::ScriptedProvider`].

use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::error::SdkError;
use aws_sdk_bedrockruntime::types::{ContentBlock, ConversationRole, Message, SystemContentBlock};
use serde::{Deserialize, Serialize};
use tracing::debug;
use zuruu_core::models::usage::TokenCount;

use crate::error::BedrockError;

/// One logical request: fixed framing plus the rendered instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderRequest {
    pub system_prompt: String,
    pub user_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderReply {
    pub text: String,
    pub model_id: String,
    pub tokens: TokenCount,
}

#[async_trait]
pub trait ReasoningProvider: Send + Sync {
    /// Send one request and return the raw reply. A single round trip: no
    /// retry, no caching.
    async fn complete(&self, request: &ProviderRequest) -> Result<ProviderReply, BedrockError>;
}

/// Bedrock Converse API provider.
#[derive(Debug, Clone)]
pub struct BedrockProvider {
    client: Client,
    model_id: String,
}

impl BedrockProvider {
    pub fn new(client: Client, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }
}

#[async_trait]
impl ReasoningProvider for BedrockProvider {
    async fn complete(&self, request: &ProviderRequest) -> Result<ProviderReply, BedrockError> {
        let response = self
            .client
            .converse()
            .model_id(&self.model_id)
            .system(SystemContentBlock::Text(request.system_prompt.clone()))
            .messages(
                Message::builder()
                    .role(ConversationRole::User)
                    .content(ContentBlock::Text(request.user_message.clone()))
                    .build()
                    .map_err(|e| BedrockError::Invocation(e.to_string()))?,
            )
            .send()
            .await
            .map_err(|e| match e {
                SdkError::TimeoutError(_) => BedrockError::Timeout,
                other => BedrockError::Invocation(other.into_service_error().to_string()),
            })?;

        let output_message = response
            .output()
            .and_then(|o| o.as_message().ok())
            .ok_or_else(|| BedrockError::ResponseParse("no message in response".to_string()))?;

        let text = output_message
            .content()
            .iter()
            .filter_map(|block| {
                if let ContentBlock::Text(text) = block {
                    Some(text.as_str())
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        let tokens = response
            .usage()
            .map(|u| TokenCount::new(u.input_tokens.max(0) as u64, u.output_tokens.max(0) as u64))
            .unwrap_or_default();

        debug!(model_id = %self.model_id, reply_len = text.len(), "converse reply received");

        Ok(ProviderReply {
            text,
            model_id: self.model_id.clone(),
            tokens,
        })
    }
}
