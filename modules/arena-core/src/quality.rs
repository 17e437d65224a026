use std::fmt;

use serde::{Deserialize, Serialize};

/// Lowest total classified as exceptional.
pub const EXCEPTIONAL_THRESHOLD: u32 = 86;
/// Lowest total classified as high.
pub const HIGH_THRESHOLD: u32 = 71;
/// Lowest total classified as medium.
pub const MEDIUM_THRESHOLD: u32 = 41;

/// Quality band of a prompt, ordered low to exceptional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    Low,
    Medium,
    High,
    Exceptional,
}

impl QualityLevel {
    pub const ALL: [QualityLevel; 4] = [
        QualityLevel::Low,
        QualityLevel::Medium,
        QualityLevel::High,
        QualityLevel::Exceptional,
    ];

    pub fn from_total(total: u32) -> Self {
        match total {
            t if t >= EXCEPTIONAL_THRESHOLD => QualityLevel::Exceptional,
            t if t >= HIGH_THRESHOLD => QualityLevel::High,
            t if t >= MEDIUM_THRESHOLD => QualityLevel::Medium,
            _ => QualityLevel::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityLevel::Low => "low",
            QualityLevel::Medium => "medium",
            QualityLevel::High => "high",
            QualityLevel::Exceptional => "exceptional",
        }
    }
}

impl fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
