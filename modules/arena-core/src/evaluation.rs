//! Prompt evaluation: rubric-score a persona prompt and map it to tier odds.

use ai_client::{strip_code_blocks, truncate_to_char_boundary, TextGenerator};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::GenerationSettings;
use crate::error::{ArenaError, ParseCause};
use crate::generation::generate;
use crate::prompts::{evaluation_prompt, EVALUATION_SYSTEM};
use crate::quality::QualityLevel;
use crate::roller::{roll_tier, DrawSource};
use crate::score::{PromptScore, ValidationMode};
use crate::tier::{Tier, TierProbabilities};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptEvaluation {
    pub score: PromptScore,
    pub tier_probabilities: TierProbabilities,
    pub quality_level: QualityLevel,
}

impl PromptEvaluation {
    pub fn from_score(score: PromptScore) -> Self {
        let quality_level = QualityLevel::from_total(score.total);
        Self {
            tier_probabilities: TierProbabilities::for_quality(quality_level),
            quality_level,
            score,
        }
    }
}

/// An evaluation together with the tier it rolled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintOutcome {
    pub evaluation: PromptEvaluation,
    pub tier: Tier,
}

/// Parse raw generator text into an evaluation. Code fences are stripped and
/// the score is validated in lenient mode.
pub fn parse_evaluation(raw: &str) -> Result<PromptEvaluation, ParseCause> {
    let value: serde_json::Value = serde_json::from_str(strip_code_blocks(raw))?;
    let score = PromptScore::from_value(&value, ValidationMode::Lenient)?;
    Ok(PromptEvaluation::from_score(score))
}

pub struct PromptEvaluator<G> {
    generator: G,
    settings: GenerationSettings,
}

impl<G: TextGenerator> PromptEvaluator<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            settings: GenerationSettings::EVALUATION,
        }
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub async fn evaluate(&self, prompt: &str) -> Result<PromptEvaluation, ArenaError> {
        if prompt.trim().is_empty() {
            return Err(ArenaError::InvalidInput("prompt is empty".to_string()));
        }

        let generation = generate(
            &self.generator,
            "evaluation",
            evaluation_prompt(prompt),
            Some(EVALUATION_SYSTEM),
            self.settings,
        )
        .await?;

        let evaluation = parse_evaluation(&generation.text).map_err(|cause| {
            warn!(
                error = %cause,
                response = truncate_to_char_boundary(&generation.text, 200),
                "Unusable evaluation response"
            );
            ArenaError::EvaluationParse(cause)
        })?;

        info!(
            total = evaluation.score.total,
            quality = %evaluation.quality_level,
            "Prompt evaluated"
        );
        Ok(evaluation)
    }

    /// Evaluate, then roll a tier from the resulting distribution.
    pub async fn evaluate_and_roll(
        &self,
        prompt: &str,
        source: &mut impl DrawSource,
    ) -> Result<MintOutcome, ArenaError> {
        let evaluation = self.evaluate(prompt).await?;
        let tier = roll_tier(&evaluation.tier_probabilities, source);

        info!(quality = %evaluation.quality_level, tier = %tier, "Tier rolled");
        Ok(MintOutcome { evaluation, tier })
    }
}
