use std::fmt;

use serde::{Deserialize, Serialize};

use crate::quality::QualityLevel;

/// Reward rarity assigned to a newly created persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Tier {
    /// Rarity order, also the default roll order.
    pub const ALL: [Tier; 4] = [Tier::Common, Tier::Rare, Tier::Epic, Tier::Legendary];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Common => "common",
            Tier::Rare => "rare",
            Tier::Epic => "epic",
            Tier::Legendary => "legendary",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Percentage weight of each tier. Rows in the fixed table sum to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierProbabilities {
    pub common: u32,
    pub rare: u32,
    pub epic: u32,
    pub legendary: u32,
}

impl TierProbabilities {
    pub const fn new(common: u32, rare: u32, epic: u32, legendary: u32) -> Self {
        Self {
            common,
            rare,
            epic,
            legendary,
        }
    }

    /// The distribution for a quality band.
    pub const fn for_quality(level: QualityLevel) -> Self {
        match level {
            QualityLevel::Exceptional => EXCEPTIONAL,
            QualityLevel::High => HIGH,
            QualityLevel::Medium => MEDIUM,
            QualityLevel::Low => LOW,
        }
    }

    pub fn weight(&self, tier: Tier) -> u32 {
        match tier {
            Tier::Common => self.common,
            Tier::Rare => self.rare,
            Tier::Epic => self.epic,
            Tier::Legendary => self.legendary,
        }
    }

    pub fn total(&self) -> u32 {
        Tier::ALL.iter().map(|&t| self.weight(t)).sum()
    }
}

const EXCEPTIONAL: TierProbabilities = TierProbabilities::new(5, 30, 45, 20);
const HIGH: TierProbabilities = TierProbabilities::new(25, 40, 28, 7);
const MEDIUM: TierProbabilities = TierProbabilities::new(50, 35, 12, 3);
const LOW: TierProbabilities = TierProbabilities::new(80, 15, 4, 1);
