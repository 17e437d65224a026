//! Typed errors for score validation and the two generator-backed pipelines.

use thiserror::Error;

use crate::battle::Side;

/// A rubric score object failed validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    /// A field was missing or not a number.
    #[error("invalid format for '{field}': {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A field fell outside its closed interval.
    #[error("'{field}' = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: f64,
        min: u32,
        max: u32,
    },

    /// Strict mode only: the declared total disagrees with the sub-score sum.
    #[error("declared total {declared} does not match sub-score sum {computed}")]
    TotalMismatch { declared: f64, computed: u32 },
}

/// Why a generator response could not be turned into a result.
#[derive(Debug, Error)]
pub enum ParseCause {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Score(#[from] ScoreError),

    #[error("missing or empty field: {0}")]
    MissingField(String),

    #[error("unknown winner '{0}', expected persona1 or persona2")]
    UnknownWinner(String),

    #[error("declared winner {winner} scored {winner_total} but the other side scored {other_total}")]
    WinnerMismatch {
        winner: Side,
        winner_total: u32,
        other_total: u32,
    },

    #[error("reasoning is {len} characters, at least {min} required")]
    ReasoningTooShort { len: usize, min: usize },
}

/// Errors surfaced by the evaluation and judging pipelines.
#[derive(Debug, Error)]
pub enum ArenaError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("text generation failed: {0:#}")]
    Generation(anyhow::Error),

    #[error("prompt evaluation failed: {0}")]
    EvaluationParse(#[source] ParseCause),

    #[error("battle judging failed: {0}")]
    JudgeParse(#[source] ParseCause),
}

impl ArenaError {
    /// The underlying parse cause, if this is a parse failure from either pipeline.
    pub fn parse_cause(&self) -> Option<&ParseCause> {
        match self {
            ArenaError::EvaluationParse(cause) | ArenaError::JudgeParse(cause) => Some(cause),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_names_the_field() {
        let err = ScoreError::OutOfRange {
            field: "creativity".to_string(),
            value: 31.0,
            min: 0,
            max: 25,
        };
        assert_eq!(err.to_string(), "'creativity' = 31 is outside [0, 25]");
    }

    #[test]
    fn parse_cause_is_reachable_from_both_pipelines() {
        let eval = ArenaError::EvaluationParse(ParseCause::MissingField("total".into()));
        let judge = ArenaError::JudgeParse(ParseCause::UnknownWinner("persona3".into()));

        assert!(matches!(eval.parse_cause(), Some(ParseCause::MissingField(_))));
        assert!(matches!(judge.parse_cause(), Some(ParseCause::UnknownWinner(_))));
        assert!(ArenaError::InvalidInput("empty".into()).parse_cause().is_none());
    }
}
