//! Battle judging: score two arguments on a topic and pick a winner.

use std::fmt;

use ai_client::{strip_code_blocks, truncate_to_char_boundary, TextGenerator};
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::config::GenerationSettings;
use crate::error::{ArenaError, ParseCause};
use crate::generation::generate;
use crate::prompts::{judge_prompt, topic_prompt, JUDGE_SYSTEM};
use crate::score::{PersonaScore, ValidationMode};

/// Minimum length of the judge's reasoning, in characters.
pub const MIN_REASONING_LEN: usize = 20;

/// Totals this close are decided by persuasiveness (a generator instruction only).
pub const CLOSE_CALL_MARGIN: u32 = 3;

// =============================================================================
// Participants
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Persona1,
    Persona2,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Persona1 => "persona1",
            Side::Persona2 => "persona2",
        }
    }

    pub fn other(&self) -> Side {
        match self {
            Side::Persona1 => Side::Persona2,
            Side::Persona2 => Side::Persona1,
        }
    }

    pub fn parse(token: &str) -> Option<Side> {
        match token.trim() {
            "persona1" => Some(Side::Persona1),
            "persona2" => Some(Side::Persona2),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized persona traits, conventionally 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaTraits {
    pub intelligence: u8,
    pub creativity: u8,
    pub persuasion: u8,
}

impl PersonaTraits {
    pub fn new(intelligence: u8, creativity: u8, persuasion: u8) -> Self {
        Self {
            intelligence,
            creativity,
            persuasion,
        }
    }
}

impl Default for PersonaTraits {
    fn default() -> Self {
        Self::new(50, 50, 50)
    }
}

/// One side of a battle: who is arguing and what they said.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contender {
    pub name: String,
    pub traits: PersonaTraits,
    pub argument: String,
}

impl Contender {
    pub fn new(name: impl Into<String>, traits: PersonaTraits, argument: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            traits,
            argument: argument.into(),
        }
    }
}

// =============================================================================
// Result
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleScores {
    pub persona1: PersonaScore,
    pub persona2: PersonaScore,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlights {
    pub persona1_best: String,
    pub persona2_best: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImprovementSuggestions {
    pub persona1: String,
    pub persona2: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleJudgeResult {
    pub winner: Side,
    pub scores: BattleScores,
    pub reasoning: String,
    pub highlights: Highlights,
    pub improvement_suggestions: ImprovementSuggestions,
}

impl BattleJudgeResult {
    pub fn score(&self, side: Side) -> &PersonaScore {
        match side {
            Side::Persona1 => &self.scores.persona1,
            Side::Persona2 => &self.scores.persona2,
        }
    }

    /// Winner's total minus the loser's total.
    pub fn margin(&self) -> u32 {
        self.score(self.winner)
            .total
            .saturating_sub(self.score(self.winner.other()).total)
    }
}

// =============================================================================
// Parsing
// =============================================================================

#[derive(Debug, Deserialize)]
struct RawJudgement {
    winner: Option<String>,
    scores: Option<RawPair<Value>>,
    reasoning: Option<String>,
    highlights: Option<RawHighlights>,
    improvement_suggestions: Option<RawPair<String>>,
}

#[derive(Debug, Deserialize)]
struct RawPair<T> {
    persona1: Option<T>,
    persona2: Option<T>,
}

#[derive(Debug, Deserialize)]
struct RawHighlights {
    persona1_best: Option<String>,
    persona2_best: Option<String>,
}

fn required_text(value: Option<String>, field: &str) -> Result<String, ParseCause> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        _ => Err(ParseCause::MissingField(field.to_string())),
    }
}

fn required_score(value: Option<Value>, field: &str) -> Result<PersonaScore, ParseCause> {
    let value = value.ok_or_else(|| ParseCause::MissingField(field.to_string()))?;
    Ok(PersonaScore::from_value(&value, ValidationMode::Strict)?)
}

/// Parse raw generator text into a judge result. Code fences are stripped,
/// both scores are validated in strict mode, and the declared winner must not
/// have the lower total.
pub fn parse_judgement(raw: &str) -> Result<BattleJudgeResult, ParseCause> {
    let raw: RawJudgement = serde_json::from_str(strip_code_blocks(raw))?;

    let winner_token = required_text(raw.winner, "winner")?;
    let winner =
        Side::parse(&winner_token).ok_or_else(|| ParseCause::UnknownWinner(winner_token))?;

    let scores = raw
        .scores
        .ok_or_else(|| ParseCause::MissingField("scores".to_string()))?;
    let scores = BattleScores {
        persona1: required_score(scores.persona1, "scores.persona1")?,
        persona2: required_score(scores.persona2, "scores.persona2")?,
    };

    let (winner_total, other_total) = match winner {
        Side::Persona1 => (scores.persona1.total, scores.persona2.total),
        Side::Persona2 => (scores.persona2.total, scores.persona1.total),
    };
    if winner_total < other_total {
        return Err(ParseCause::WinnerMismatch {
            winner,
            winner_total,
            other_total,
        });
    }

    let reasoning = required_text(raw.reasoning, "reasoning")?;
    let len = reasoning.chars().count();
    if len < MIN_REASONING_LEN {
        return Err(ParseCause::ReasoningTooShort {
            len,
            min: MIN_REASONING_LEN,
        });
    }

    let highlights = raw
        .highlights
        .ok_or_else(|| ParseCause::MissingField("highlights".to_string()))?;
    let suggestions = raw
        .improvement_suggestions
        .ok_or_else(|| ParseCause::MissingField("improvement_suggestions".to_string()))?;

    Ok(BattleJudgeResult {
        winner,
        scores,
        reasoning,
        highlights: Highlights {
            persona1_best: required_text(highlights.persona1_best, "highlights.persona1_best")?,
            persona2_best: required_text(highlights.persona2_best, "highlights.persona2_best")?,
        },
        improvement_suggestions: ImprovementSuggestions {
            persona1: required_text(suggestions.persona1, "improvement_suggestions.persona1")?,
            persona2: required_text(suggestions.persona2, "improvement_suggestions.persona2")?,
        },
    })
}

/// True when the totals are within the close-call margin and the winner is
/// the less persuasive side.
pub fn is_close_call(result: &BattleJudgeResult) -> bool {
    let winner = result.score(result.winner);
    let loser = result.score(result.winner.other());
    result.margin() <= CLOSE_CALL_MARGIN && winner.persuasiveness < loser.persuasiveness
}

/// Warn on a close call. The winner is still accepted; the tie-break is only
/// ever asked of the generator.
fn check_close_call(result: &BattleJudgeResult) {
    if is_close_call(result) {
        let winner = result.score(result.winner);
        let loser = result.score(result.winner.other());
        warn!(
            winner = %result.winner,
            margin = result.margin(),
            winner_persuasiveness = winner.persuasiveness,
            loser_persuasiveness = loser.persuasiveness,
            "Close battle awarded to the less persuasive side"
        );
    }
}

/// Trim a generated topic and drop any wrapping quotes.
pub fn clean_topic(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c| matches!(c, '"' | '\'' | '“' | '”'))
        .trim()
        .to_string()
}

// =============================================================================
// Judge
// =============================================================================

pub struct BattleJudge<G> {
    generator: G,
    judge_settings: GenerationSettings,
    topic_settings: GenerationSettings,
}

impl<G: TextGenerator> BattleJudge<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            judge_settings: GenerationSettings::JUDGE,
            topic_settings: GenerationSettings::TOPIC,
        }
    }

    pub fn with_judge_settings(mut self, settings: GenerationSettings) -> Self {
        self.judge_settings = settings;
        self
    }

    pub fn with_topic_settings(mut self, settings: GenerationSettings) -> Self {
        self.topic_settings = settings;
        self
    }

    pub async fn judge(
        &self,
        topic: &str,
        persona1: &Contender,
        persona2: &Contender,
    ) -> Result<BattleJudgeResult, ArenaError> {
        if topic.trim().is_empty() {
            return Err(ArenaError::InvalidInput("topic is empty".to_string()));
        }
        for (side, contender) in [(Side::Persona1, persona1), (Side::Persona2, persona2)] {
            if contender.argument.trim().is_empty() {
                return Err(ArenaError::InvalidInput(format!("{side} argument is empty")));
            }
        }

        let generation = generate(
            &self.generator,
            "judge",
            judge_prompt(topic, persona1, persona2),
            Some(JUDGE_SYSTEM),
            self.judge_settings,
        )
        .await?;

        let result = parse_judgement(&generation.text).map_err(|cause| {
            warn!(
                error = %cause,
                response = truncate_to_char_boundary(&generation.text, 200),
                "Unusable judge response"
            );
            ArenaError::JudgeParse(cause)
        })?;
        check_close_call(&result);

        info!(
            winner = %result.winner,
            persona1_total = result.scores.persona1.total,
            persona2_total = result.scores.persona2.total,
            "Battle judged"
        );
        Ok(result)
    }

    /// Ask the generator for a debate topic. No validation beyond trimming.
    pub async fn generate_topic(&self, theme: Option<&str>) -> Result<String, ArenaError> {
        let generation = generate(
            &self.generator,
            "topic",
            topic_prompt(theme),
            None,
            self.topic_settings,
        )
        .await?;

        let topic = clean_topic(&generation.text);
        if topic.is_empty() {
            return Err(ArenaError::Generation(anyhow!("generator returned an empty topic")));
        }
        Ok(topic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScoreError;
    use serde_json::json;

    fn judgement(winner: &str, total1: u32, total2: u32) -> Value {
        json!({
            "winner": winner,
            "scores": {
                "persona1": score_json(total1),
                "persona2": score_json(total2),
            },
            "reasoning": "Persona one grounded every claim in evidence.",
            "highlights": {
                "persona1_best": "Cited the transit study.",
                "persona2_best": "Vivid personal anecdote."
            },
            "improvement_suggestions": {
                "persona1": "Add an emotional hook.",
                "persona2": "Back claims with data."
            }
        })
    }

    /// A valid persona score object summing to `total` (max 100).
    fn score_json(total: u32) -> Value {
        let logical = total.min(30);
        let creativity = (total - logical).min(25);
        let persuasiveness = (total - logical - creativity).min(25);
        let relevance = total - logical - creativity - persuasiveness;
        json!({
            "logical_coherence": logical,
            "creativity": creativity,
            "persuasiveness": persuasiveness,
            "topic_relevance": relevance,
            "total": total
        })
    }

    fn parse(value: &Value) -> Result<BattleJudgeResult, ParseCause> {
        parse_judgement(&value.to_string())
    }

    #[test]
    fn valid_judgement_parses() {
        let result = parse(&judgement("persona1", 82, 70)).unwrap();
        assert_eq!(result.winner, Side::Persona1);
        assert_eq!(result.margin(), 12);
        assert_eq!(result.highlights.persona2_best, "Vivid personal anecdote.");
    }

    #[test]
    fn tied_totals_accept_either_winner() {
        assert!(parse(&judgement("persona2", 75, 75)).is_ok());
        assert!(parse(&judgement("persona1", 75, 75)).is_ok());
    }

    #[test]
    fn winner_with_lower_total_is_rejected() {
        let err = parse(&judgement("persona1", 60, 80)).unwrap_err();
        match err {
            ParseCause::WinnerMismatch {
                winner,
                winner_total,
                other_total,
            } => {
                assert_eq!(winner, Side::Persona1);
                assert_eq!(winner_total, 60);
                assert_eq!(other_total, 80);
            }
            other => panic!("expected WinnerMismatch, got {other:?}"),
        }
    }

    #[test]
    fn unknown_winner_is_rejected() {
        let err = parse(&judgement("draw", 70, 70)).unwrap_err();
        assert!(matches!(err, ParseCause::UnknownWinner(ref w) if w == "draw"));
    }

    #[test]
    fn missing_persona2_highlight_is_rejected() {
        let mut value = judgement("persona1", 82, 70);
        value["highlights"]
            .as_object_mut()
            .unwrap()
            .remove("persona2_best");
        let err = parse(&value).unwrap_err();
        assert!(matches!(err, ParseCause::MissingField(ref f) if f == "highlights.persona2_best"));
    }

    #[test]
    fn blank_suggestion_is_rejected() {
        let mut value = judgement("persona1", 82, 70);
        value["improvement_suggestions"]["persona2"] = json!("   ");
        let err = parse(&value).unwrap_err();
        assert!(
            matches!(err, ParseCause::MissingField(ref f) if f == "improvement_suggestions.persona2")
        );
    }

    #[test]
    fn short_reasoning_is_rejected() {
        let mut value = judgement("persona1", 82, 70);
        value["reasoning"] = json!("P1 better.");
        let err = parse(&value).unwrap_err();
        assert!(matches!(err, ParseCause::ReasoningTooShort { len: 10, min: 20 }));
    }

    #[test]
    fn missing_reasoning_is_rejected() {
        let mut value = judgement("persona1", 82, 70);
        value.as_object_mut().unwrap().remove("reasoning");
        assert!(matches!(
            parse(&value).unwrap_err(),
            ParseCause::MissingField(ref f) if f == "reasoning"
        ));
    }

    #[test]
    fn inconsistent_total_is_a_strict_failure() {
        let mut value = judgement("persona1", 82, 70);
        value["scores"]["persona2"]["total"] = json!(65);
        let err = parse(&value).unwrap_err();
        assert!(matches!(
            err,
            ParseCause::Score(ScoreError::TotalMismatch { computed: 70, .. })
        ));
    }

    #[test]
    fn missing_score_object_is_rejected() {
        let mut value = judgement("persona1", 82, 70);
        value["scores"].as_object_mut().unwrap().remove("persona1");
        assert!(matches!(
            parse(&value).unwrap_err(),
            ParseCause::MissingField(ref f) if f == "scores.persona1"
        ));
    }

    #[test]
    fn result_round_trips_the_wire_shape() {
        let result = parse(&judgement("persona2", 70, 73)).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["winner"], "persona2");
        assert_eq!(json["scores"]["persona2"]["total"], 73);
        assert!(json["improvement_suggestions"]["persona1"].is_string());
    }

    fn persona(scores: [u32; 4]) -> Value {
        json!({
            "logical_coherence": scores[0],
            "creativity": scores[1],
            "persuasiveness": scores[2],
            "topic_relevance": scores[3],
            "total": scores.iter().sum::<u32>()
        })
    }

    fn with_scores(winner: &str, persona1: [u32; 4], persona2: [u32; 4]) -> BattleJudgeResult {
        let mut value = judgement(winner, 0, 0);
        value["scores"] = json!({ "persona1": persona(persona1), "persona2": persona(persona2) });
        parse(&value).unwrap()
    }

    #[test]
    fn close_call_needs_small_margin_and_less_persuasive_winner() {
        // 75 vs 72, winner persuasiveness 10 vs 20
        let result = with_scores("persona1", [30, 25, 10, 10], [30, 20, 20, 2]);
        assert_eq!(result.margin(), 3);
        assert!(is_close_call(&result));

        // 75 vs 71
        let result = with_scores("persona1", [30, 25, 10, 10], [30, 20, 20, 1]);
        assert_eq!(result.margin(), 4);
        assert!(!is_close_call(&result));

        // winner is the more persuasive side
        let result = with_scores("persona1", [30, 10, 25, 10], [30, 20, 20, 2]);
        assert_eq!(result.margin(), 3);
        assert!(!is_close_call(&result));
    }

    #[test]
    fn clean_topic_strips_quotes_and_whitespace() {
        assert_eq!(
            clean_topic("  \"Should AI have rights?\"\n"),
            "Should AI have rights?"
        );
        assert_eq!(clean_topic("“Is math invented?”"), "Is math invented?");
    }

    #[test]
    fn side_helpers() {
        assert_eq!(Side::parse(" persona2 "), Some(Side::Persona2));
        assert_eq!(Side::parse("Persona2"), None);
        assert_eq!(Side::Persona1.other(), Side::Persona2);
    }
}
