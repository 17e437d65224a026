//! Rubric score objects and their validator.
//!
//! Generator output is read as loose JSON and checked against a [`Rubric`]:
//! every sub-score must be a number inside its closed interval, and the
//! declared total must agree with the sub-score sum. What happens when the
//! total disagrees is chosen by the caller through [`ValidationMode`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::ScoreError;

/// Slack allowed between a declared total and the recomputed sub-score sum.
pub const TOTAL_TOLERANCE: f64 = 1.0;

/// How a declared total that disagrees with its sub-scores is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// The total is always replaced by the sub-score sum.
    Lenient,
    /// A total off by more than [`TOTAL_TOLERANCE`] is rejected.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreRange {
    pub field: &'static str,
    pub min: u32,
    pub max: u32,
}

impl ScoreRange {
    pub const fn new(field: &'static str, min: u32, max: u32) -> Self {
        Self { field, min, max }
    }

    fn check(&self, value: f64) -> Result<u32, ScoreError> {
        if value < f64::from(self.min) || value > f64::from(self.max) {
            return Err(ScoreError::OutOfRange {
                field: self.field.to_string(),
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(value.round() as u32)
    }
}

/// Four sub-score ranges plus the range of the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rubric {
    pub fields: [ScoreRange; 4],
    pub total: ScoreRange,
}

pub const PROMPT_RUBRIC: Rubric = Rubric {
    fields: [
        ScoreRange::new("specificity", 0, 25),
        ScoreRange::new("creativity", 0, 25),
        ScoreRange::new("coherence", 0, 25),
        ScoreRange::new("complexity", 0, 25),
    ],
    total: ScoreRange::new("total", 0, 100),
};

pub const PERSONA_RUBRIC: Rubric = Rubric {
    fields: [
        ScoreRange::new("logical_coherence", 0, 30),
        ScoreRange::new("creativity", 0, 25),
        ScoreRange::new("persuasiveness", 0, 25),
        ScoreRange::new("topic_relevance", 0, 20),
    ],
    total: ScoreRange::new("total", 0, 100),
};

/// Sub-scores in rubric order and the accepted total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedScores {
    pub values: [u32; 4],
    pub total: u32,
}

impl Rubric {
    pub fn validate(
        &self,
        candidate: &Value,
        mode: ValidationMode,
    ) -> Result<ValidatedScores, ScoreError> {
        let object = candidate
            .as_object()
            .ok_or_else(|| ScoreError::InvalidFormat {
                field: "score".to_string(),
                reason: format!("expected an object, got {}", kind_of(candidate)),
            })?;

        let mut values = [0u32; 4];
        for (slot, range) in values.iter_mut().zip(self.fields.iter()) {
            *slot = range.check(read_number(object, range.field)?)?;
        }
        let computed: u32 = values.iter().sum();

        let declared = read_number(object, self.total.field)?;
        let drift = (declared - f64::from(computed)).abs();

        let total = match mode {
            ValidationMode::Lenient => {
                if drift > TOTAL_TOLERANCE {
                    warn!(declared, computed, "Declared total disagrees with sub-scores, recomputing");
                }
                computed
            }
            ValidationMode::Strict => {
                let total = self.total.check(declared)?;
                if drift > TOTAL_TOLERANCE {
                    return Err(ScoreError::TotalMismatch { declared, computed });
                }
                total
            }
        };

        Ok(ValidatedScores { values, total })
    }
}

fn read_number(object: &Map<String, Value>, field: &str) -> Result<f64, ScoreError> {
    let value = object.get(field).ok_or_else(|| ScoreError::InvalidFormat {
        field: field.to_string(),
        reason: "missing".to_string(),
    })?;
    value
        .as_f64()
        .filter(|n| n.is_finite())
        .ok_or_else(|| ScoreError::InvalidFormat {
            field: field.to_string(),
            reason: format!("expected a number, got {}", kind_of(value)),
        })
}

fn read_reasoning(candidate: &Value) -> Result<String, ScoreError> {
    match candidate.get("reasoning") {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(ScoreError::InvalidFormat {
            field: "reasoning".to_string(),
            reason: format!("expected a string, got {}", kind_of(other)),
        }),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// =============================================================================
// PromptScore
// =============================================================================

/// Rubric score for a persona-creation prompt. Each sub-score is 0-25.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptScore {
    pub specificity: u32,
    pub creativity: u32,
    pub coherence: u32,
    pub complexity: u32,
    pub total: u32,
    pub reasoning: String,
}

impl PromptScore {
    pub fn from_value(candidate: &Value, mode: ValidationMode) -> Result<Self, ScoreError> {
        let ValidatedScores { values, total } = PROMPT_RUBRIC.validate(candidate, mode)?;
        let [specificity, creativity, coherence, complexity] = values;
        Ok(Self {
            specificity,
            creativity,
            coherence,
            complexity,
            total,
            reasoning: read_reasoning(candidate)?,
        })
    }

    pub fn sub_score_sum(&self) -> u32 {
        self.specificity + self.creativity + self.coherence + self.complexity
    }
}

// =============================================================================
// PersonaScore
// =============================================================================

/// Rubric score for one side of a battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaScore {
    pub logical_coherence: u32,
    pub creativity: u32,
    pub persuasiveness: u32,
    pub topic_relevance: u32,
    pub total: u32,
}

impl PersonaScore {
    pub fn from_value(candidate: &Value, mode: ValidationMode) -> Result<Self, ScoreError> {
        let ValidatedScores { values, total } = PERSONA_RUBRIC.validate(candidate, mode)?;
        let [logical_coherence, creativity, persuasiveness, topic_relevance] = values;
        Ok(Self {
            logical_coherence,
            creativity,
            persuasiveness,
            topic_relevance,
            total,
        })
    }

    pub fn sub_score_sum(&self) -> u32 {
        self.logical_coherence + self.creativity + self.persuasiveness + self.topic_relevance
    }
}
