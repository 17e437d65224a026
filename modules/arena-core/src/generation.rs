use ai_client::{FinishReason, Generation, GenerationRequest, TextGenerator};
use tracing::{debug, warn};

use crate::config::GenerationSettings;
use crate::error::ArenaError;

/// Send one request to the generator and log anything unusual about how it
/// finished. The text is returned as-is; callers decide whether it parses.
pub(crate) async fn generate<G: TextGenerator + ?Sized>(
    generator: &G,
    pipeline: &'static str,
    prompt: String,
    system: Option<&str>,
    settings: GenerationSettings,
) -> Result<Generation, ArenaError> {
    let mut request = settings.apply(GenerationRequest::new(prompt));
    if let Some(system) = system {
        request = request.system(system);
    }

    let generation = generator
        .generate(request)
        .await
        .map_err(ArenaError::Generation)?;

    debug!(
        pipeline,
        input_tokens = generation.usage.input_tokens,
        output_tokens = generation.usage.output_tokens,
        finish_reason = ?generation.finish_reason,
        "Generator responded"
    );

    match generation.finish_reason {
        FinishReason::Stop => {}
        FinishReason::Length => {
            warn!(pipeline, max_tokens = settings.max_tokens, "Generator output truncated at token limit");
        }
        FinishReason::ContentFilter => {
            warn!(pipeline, "Generator output was content filtered");
        }
    }

    Ok(generation)
}
