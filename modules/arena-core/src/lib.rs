pub mod battle;
pub mod config;
pub mod error;
pub mod evaluation;
mod generation;
pub mod prompts;
pub mod quality;
pub mod roller;
pub mod score;
pub mod tier;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use battle::{
    BattleJudge, BattleJudgeResult, BattleScores, Contender, Highlights, ImprovementSuggestions,
    PersonaTraits, Side,
};
pub use config::{load_config, ArenaConfig, GenerationSettings, ProviderKind, Secrets};
pub use error::{ArenaError, ParseCause, ScoreError};
pub use evaluation::{MintOutcome, PromptEvaluation, PromptEvaluator};
pub use quality::QualityLevel;
pub use roller::{roll_tier, roll_tier_in_order, DrawSource, FixedDraw, RngDraw, SequenceDraw};
pub use score::{PersonaScore, PromptScore, Rubric, ValidationMode};
pub use tier::{Tier, TierProbabilities};
