mod client;
pub(crate) mod types;

use anyhow::Result;
use async_trait::async_trait;

use crate::error::AiError;
use crate::traits::{FinishReason, Generation, GenerationRequest, TextGenerator, TokenUsage};
use client::OpenAiClient;
use types::*;

// =============================================================================
// OpenAi Generator
// =============================================================================

#[derive(Clone)]
pub struct OpenAi {
    api_key: String,
    pub(crate) model: String,
    base_url: Option<String>,
}

impl OpenAi {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Get the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    pub(crate) fn client(&self) -> OpenAiClient {
        let client = OpenAiClient::new(&self.api_key);
        if let Some(ref url) = self.base_url {
            client.with_base_url(url)
        } else {
            client
        }
    }

    pub(crate) fn build_request(&self, request: GenerationRequest) -> ChatRequest {
        let mut chat = ChatRequest::new(&self.model);
        if let Some(system) = request.system {
            chat = chat.message(WireMessage::system(system));
        }
        chat = chat
            .message(WireMessage::user(request.prompt))
            .stop(request.stop);

        // Reasoning models reject both max_tokens and a non-default temperature.
        if uses_max_completion_tokens(&self.model) {
            chat.max_completion_tokens(request.max_tokens)
        } else {
            chat.max_tokens(request.max_tokens)
                .temperature(request.temperature)
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAi {
    async fn generate(&self, request: GenerationRequest) -> Result<Generation> {
        let chat = self.build_request(request);
        let response = self.client().chat(&chat).await?;

        let usage = response
            .usage
            .as_ref()
            .map(TokenUsage::from)
            .unwrap_or_default();

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(AiError::EmptyResponse { provider: "OpenAI" })?;
        let finish_reason = choice.finish_reason();

        // A filtered completion has no content; surface it as empty text so the
        // caller sees the finish reason instead of a transport error.
        let text = match (choice.message.content, finish_reason) {
            (Some(text), _) => text,
            (None, FinishReason::ContentFilter) => String::new(),
            (None, _) => return Err(AiError::EmptyResponse { provider: "OpenAI" }.into()),
        };

        Ok(Generation {
            text,
            usage,
            finish_reason,
        })
    }
}
