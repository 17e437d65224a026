// Test mocks for the evaluation and judging pipelines.
//
// MockGenerator (TextGenerator) replays queued generations in order and
// records every request it receives, so tests can assert on prompt content
// and sampling settings without a network.

use std::collections::VecDeque;
use std::sync::Mutex;

use ai_client::{FinishReason, Generation, GenerationRequest, TextGenerator, TokenUsage};
use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// MockGenerator
// ---------------------------------------------------------------------------

/// Queue-based text generator. Returns `Err` once the queue is empty.
/// Builder pattern: `.on_text()`, `.on_generation()`, `.on_error()`.
#[derive(Default)]
pub struct MockGenerator {
    responses: Mutex<VecDeque<Result<Generation, String>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_text(self, text: impl Into<String>) -> Self {
        self.on_generation(Generation::stopped(text))
    }

    pub fn on_generation(self, generation: Generation) -> Self {
        self.push(Ok(generation));
        self
    }

    pub fn on_finish(self, text: impl Into<String>, finish_reason: FinishReason) -> Self {
        self.on_generation(Generation {
            text: text.into(),
            usage: TokenUsage::default(),
            finish_reason,
        })
    }

    pub fn on_error(self, message: impl Into<String>) -> Self {
        self.push(Err(message.into()));
        self
    }

    fn push(&self, response: Result<Generation, String>) {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(response);
        }
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<Generation> {
        self.requests
            .lock()
            .map_err(|_| anyhow!("MockGenerator: request log poisoned"))?
            .push(request);

        let next = self
            .responses
            .lock()
            .map_err(|_| anyhow!("MockGenerator: response queue poisoned"))?
            .pop_front();

        match next {
            Some(Ok(generation)) => Ok(generation),
            Some(Err(message)) => bail!("MockGenerator: {message}"),
            None => bail!("MockGenerator: no response queued"),
        }
    }
}

// ---------------------------------------------------------------------------
// Response fixtures
// ---------------------------------------------------------------------------

/// Prompt-evaluation JSON with the given sub-scores and declared total.
pub fn prompt_score_json(sub_scores: [u32; 4], total: u32, reasoning: &str) -> String {
    let [specificity, creativity, coherence, complexity] = sub_scores;
    json!({
        "specificity": specificity,
        "creativity": creativity,
        "coherence": coherence,
        "complexity": complexity,
        "total": total,
        "reasoning": reasoning,
    })
    .to_string()
}

/// Persona score object with the given sub-scores; total is their sum.
pub fn persona_score(sub_scores: [u32; 4]) -> Value {
    let [logical_coherence, creativity, persuasiveness, topic_relevance] = sub_scores;
    json!({
        "logical_coherence": logical_coherence,
        "creativity": creativity,
        "persuasiveness": persuasiveness,
        "topic_relevance": topic_relevance,
        "total": sub_scores.iter().sum::<u32>(),
    })
}

/// A complete, valid judge response as a JSON value, ready for tweaking.
pub fn judgement_value(winner: &str, persona1: Value, persona2: Value) -> Value {
    json!({
        "winner": winner,
        "scores": { "persona1": persona1, "persona2": persona2 },
        "reasoning": "The winning side answered the topic directly and supported each claim.",
        "highlights": {
            "persona1_best": "Opened with a concrete statistic.",
            "persona2_best": "Closed with a memorable analogy."
        },
        "improvement_suggestions": {
            "persona1": "Address the strongest counterargument.",
            "persona2": "Stay closer to the topic."
        }
    })
}
