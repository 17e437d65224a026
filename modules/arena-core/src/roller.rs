//! Tier rolling with an injectable draw source.

use rand::rngs::ThreadRng;
use rand::Rng;
use tracing::{debug, warn};

use crate::tier::{Tier, TierProbabilities};

/// Source of uniform draws in `[0, 100)`.
pub trait DrawSource {
    fn draw(&mut self) -> f64;
}

/// Draws from any `rand` generator.
pub struct RngDraw<R>(pub R);

impl RngDraw<ThreadRng> {
    pub fn thread() -> Self {
        Self(rand::rng())
    }
}

impl<R: Rng> DrawSource for RngDraw<R> {
    fn draw(&mut self) -> f64 {
        self.0.random_range(0.0..100.0)
    }
}

/// Always returns the same draw.
#[derive(Debug, Clone, Copy)]
pub struct FixedDraw(pub f64);

impl DrawSource for FixedDraw {
    fn draw(&mut self) -> f64 {
        self.0
    }
}

/// Cycles through a fixed list of draws.
#[derive(Debug, Clone)]
pub struct SequenceDraw {
    values: Vec<f64>,
    next: usize,
}

impl SequenceDraw {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, next: 0 }
    }
}

impl DrawSource for SequenceDraw {
    fn draw(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        value
    }
}

/// Roll a tier walking [`Tier::ALL`] in rarity order.
pub fn roll_tier(probabilities: &TierProbabilities, source: &mut impl DrawSource) -> Tier {
    roll_tier_in_order(probabilities, &Tier::ALL, source)
}

/// Roll a tier walking `order`, returning the first tier whose cumulative
/// weight exceeds the draw. Falls back to the first tier in `order` when no
/// tier is selected.
pub fn roll_tier_in_order(
    probabilities: &TierProbabilities,
    order: &[Tier],
    source: &mut impl DrawSource,
) -> Tier {
    let draw = source.draw();
    let mut cumulative = 0.0;

    for &tier in order {
        cumulative += f64::from(probabilities.weight(tier));
        if draw < cumulative {
            debug!(draw, tier = %tier, "Rolled tier");
            return tier;
        }
    }

    let fallback = order.first().copied().unwrap_or(Tier::Common);
    warn!(
        draw,
        cumulative,
        fallback = %fallback,
        "Draw not covered by tier weights, using first tier"
    );
    fallback
}
