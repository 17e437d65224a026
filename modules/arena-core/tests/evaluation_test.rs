//! End-to-end tests for the prompt evaluation pipeline against a mocked generator.

use std::sync::Arc;

use ai_client::FinishReason;
use arena_core::testing::{prompt_score_json, MockGenerator};
use arena_core::{
    ArenaError, FixedDraw, GenerationSettings, ParseCause, PromptEvaluator, QualityLevel,
    ScoreError, Tier, TierProbabilities,
};

const SAMPLE: &str = r#"{"specificity":20,"creativity":18,"coherence":22,"complexity":15,"total":74,"reasoning":"Well-structured and specific."}"#;

fn evaluator(generator: &Arc<MockGenerator>) -> PromptEvaluator<Arc<MockGenerator>> {
    PromptEvaluator::new(generator.clone())
}

#[tokio::test]
async fn sample_output_yields_high_band() {
    let generator = Arc::new(MockGenerator::new().on_text(SAMPLE));

    let evaluation = evaluator(&generator)
        .evaluate("A retired astronaut who runs a bakery on Mars")
        .await
        .unwrap();

    assert_eq!(evaluation.quality_level, QualityLevel::High);
    assert_eq!(
        evaluation.tier_probabilities,
        TierProbabilities {
            common: 25,
            rare: 40,
            epic: 28,
            legendary: 7
        }
    );
}

#[tokio::test]
async fn request_embeds_prompt_with_low_temperature() {
    let generator = Arc::new(MockGenerator::new().on_text(SAMPLE));

    evaluator(&generator)
        .evaluate("A cartographer of dreams")
        .await
        .unwrap();

    let requests = generator.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].prompt.contains("A cartographer of dreams"));
    assert_eq!(requests[0].temperature, GenerationSettings::EVALUATION.temperature);
    assert_eq!(requests[0].max_tokens, GenerationSettings::EVALUATION.max_tokens);
    assert!(requests[0].system.is_some());
}

#[tokio::test]
async fn custom_settings_reach_the_generator() {
    let generator = Arc::new(MockGenerator::new().on_text(SAMPLE));
    let settings = GenerationSettings {
        max_tokens: 256,
        temperature: 0.0,
    };

    evaluator(&generator)
        .with_settings(settings)
        .evaluate("A cartographer of dreams")
        .await
        .unwrap();

    assert_eq!(generator.requests()[0].max_tokens, 256);
    assert_eq!(generator.requests()[0].temperature, 0.0);
}

#[tokio::test]
async fn fenced_output_is_accepted() {
    let generator = Arc::new(MockGenerator::new().on_text(format!("```json\n{SAMPLE}\n```")));

    let evaluation = evaluator(&generator).evaluate("x").await.unwrap();
    assert_eq!(evaluation.score.specificity, 20);
}

#[tokio::test]
async fn malformed_output_is_an_evaluation_parse_error() {
    let generator = Arc::new(MockGenerator::new().on_text("Sure! Here's my evaluation: great prompt."));

    let err = evaluator(&generator).evaluate("x").await.unwrap_err();
    assert!(matches!(err, ArenaError::EvaluationParse(ParseCause::Json(_))));
}

#[tokio::test]
async fn out_of_range_output_is_an_evaluation_parse_error() {
    let generator =
        Arc::new(MockGenerator::new().on_text(prompt_score_json([26, 10, 10, 10], 56, "")));

    let err = evaluator(&generator).evaluate("x").await.unwrap_err();
    assert!(matches!(
        err,
        ArenaError::EvaluationParse(ParseCause::Score(ScoreError::OutOfRange { .. }))
    ));
}

#[tokio::test]
async fn failures_are_not_retried() {
    let generator = Arc::new(
        MockGenerator::new()
            .on_text("not json")
            .on_text(SAMPLE),
    );

    assert!(evaluator(&generator).evaluate("x").await.is_err());
    assert_eq!(generator.request_count(), 1);
}

#[tokio::test]
async fn generator_error_is_surfaced() {
    let generator = Arc::new(MockGenerator::new().on_error("503 overloaded"));

    let err = evaluator(&generator).evaluate("x").await.unwrap_err();
    assert!(matches!(err, ArenaError::Generation(_)));
    assert!(err.to_string().contains("503 overloaded"));
}

#[tokio::test]
async fn empty_prompt_is_rejected_without_calling_generator() {
    let generator = Arc::new(MockGenerator::new().on_text(SAMPLE));

    let err = evaluator(&generator).evaluate("   ").await.unwrap_err();
    assert!(matches!(err, ArenaError::InvalidInput(_)));
    assert_eq!(generator.request_count(), 0);
}

#[tokio::test]
async fn content_filtered_output_still_goes_through_parsing() {
    let generator =
        Arc::new(MockGenerator::new().on_finish("", FinishReason::ContentFilter));

    let err = evaluator(&generator).evaluate("x").await.unwrap_err();
    assert!(matches!(err, ArenaError::EvaluationParse(ParseCause::Json(_))));
}

#[tokio::test]
async fn evaluate_and_roll_uses_injected_draw() {
    let exceptional = prompt_score_json([24, 23, 22, 21], 90, "Vivid and layered.");
    let generator = Arc::new(
        MockGenerator::new()
            .on_text(exceptional.clone())
            .on_text(exceptional),
    );
    let evaluator = evaluator(&generator);

    let low_draw = evaluator
        .evaluate_and_roll("x", &mut FixedDraw(0.0))
        .await
        .unwrap();
    assert_eq!(low_draw.evaluation.quality_level, QualityLevel::Exceptional);
    assert_eq!(low_draw.tier, Tier::Common);

    let high_draw = evaluator
        .evaluate_and_roll("x", &mut FixedDraw(99.0))
        .await
        .unwrap();
    assert_eq!(high_draw.tier, Tier::Legendary);
}
