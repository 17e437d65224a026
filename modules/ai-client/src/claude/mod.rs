mod client;
pub(crate) mod types;

use anyhow::Result;
use async_trait::async_trait;

use crate::error::AiError;
use crate::traits::{FinishReason, Generation, GenerationRequest, TextGenerator};
use client::ClaudeClient;
use types::*;

// =============================================================================
// Claude Generator
// =============================================================================

#[derive(Clone)]
pub struct Claude {
    api_key: String,
    pub(crate) model: String,
    base_url: Option<String>,
}

impl Claude {
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

    pub fn model(&self) -> &str {
        &self.model
    }

    pub(crate) fn client(&self) -> ClaudeClient {
        let client = ClaudeClient::new(&self.api_key);
        if let Some(ref url) = self.base_url {
            client.with_base_url(url)
        } else {
            client
        }
    }

    pub(crate) fn build_request(&self, request: GenerationRequest) -> ChatRequest {
        ChatRequest::new(&self.model)
            .system(request.system)
            .message(WireMessage::user(request.prompt))
            .max_tokens(request.max_tokens)
            .temperature(request.temperature)
            .stop_sequences(request.stop)
    }
}

#[async_trait]
impl TextGenerator for Claude {
    async fn generate(&self, request: GenerationRequest) -> Result<Generation> {
        let chat = self.build_request(request);
        let response = self.client().chat(&chat).await?;
        Ok(into_generation(response)?)
    }
}

fn into_generation(response: ChatResponse) -> Result<Generation, AiError> {
    let finish_reason = response.finish_reason();

    // A refusal may carry no text block; surface it as empty text so the
    // caller sees the finish reason instead of a transport error.
    let text = match (response.text(), finish_reason) {
        (Some(text), _) => text,
        (None, FinishReason::ContentFilter) => String::new(),
        (None, _) => return Err(AiError::EmptyResponse { provider: "Claude" }),
    };

    Ok(Generation {
        text,
        usage: response.token_usage(),
        finish_reason,
    })
}
