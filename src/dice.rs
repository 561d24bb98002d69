//! Dice rolling engine
//!
//! Produces batched integer samples for N-sided dice:
//! - Plain rolls: each trial is the sum of `count` uniform draws over `[1, sides]`
//! - Reroll-low rule: component dice landing on 1 or 2 are redrawn exactly once
//! - Advantage/disadvantage: roll two batches, keep the element-wise better/worse

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SimError;
use crate::rng::SimRng;

/// What to do with low component dice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RerollRule {
    /// Keep every draw as-is
    #[default]
    Keep,
    /// Redraw any component die that lands on 1 or 2, exactly once, keeping
    /// the new value unconditionally (it may again be 1 or 2)
    RerollLowOnce,
}

/// A batch-rolling die: `count` dice of `sides` sides summed per trial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDie")]
pub struct Die {
    sides: u32,
    count: u32,
    reroll: RerollRule,
}

/// Unvalidated wire form of [`Die`]; deserialization funnels through
/// [`Die::new`] so serialized data cannot smuggle in a zero-sided die
#[derive(Deserialize)]
struct RawDie {
    sides: u32,
    count: u32,
    #[serde(default)]
    reroll: RerollRule,
}

impl TryFrom<RawDie> for Die {
    type Error = SimError;

    fn try_from(raw: RawDie) -> Result<Self, Self::Error> {
        let die = Die::new(raw.sides, raw.count)?;
        Ok(match raw.reroll {
            RerollRule::RerollLowOnce => die.with_reroll_low(),
            RerollRule::Keep => die,
        })
    }
}

impl Die {
    /// Create a die, rejecting zero sides or zero dice
    pub fn new(sides: u32, count: u32) -> Result<Self, SimError> {
        if sides < 1 || count < 1 {
            return Err(SimError::InvalidDie { sides, count });
        }
        Ok(Self {
            sides,
            count,
            reroll: RerollRule::Keep,
        })
    }

    /// The single d20 used for attack and initiative rolls
    pub fn d20() -> Self {
        Self {
            sides: 20,
            count: 1,
            reroll: RerollRule::Keep,
        }
    }

    /// The single d12 used as the berserker hit die
    pub fn d12() -> Self {
        Self {
            sides: 12,
            count: 1,
            reroll: RerollRule::Keep,
        }
    }

    /// The same die with the reroll-low rule applied
    pub fn with_reroll_low(self) -> Self {
        Self {
            reroll: RerollRule::RerollLowOnce,
            ..self
        }
    }

    /// One die of the same sides and reroll rule
    pub fn single(self) -> Self {
        Self { count: 1, ..self }
    }

    /// Number of sides per die
    pub fn sides(&self) -> u32 {
        self.sides
    }

    /// Number of dice summed per trial
    pub fn count(&self) -> u32 {
        self.count
    }

    /// The reroll rule in effect
    pub fn reroll_rule(&self) -> RerollRule {
        self.reroll
    }

    /// Analytic mean of one plain trial: `count * (sides + 1) / 2`
    pub fn expected_value(&self) -> f64 {
        self.count as f64 * (self.sides as f64 + 1.0) / 2.0
    }

    /// One component die, honoring the reroll rule
    fn component(&self, rng: &mut SimRng) -> u32 {
        let face = rng.die_face(self.sides);
        match self.reroll {
            RerollRule::RerollLowOnce if face <= 2 => rng.die_face(self.sides),
            _ => face,
        }
    }

    /// One trial: the sum of `count` component dice
    pub fn roll_one(&self, rng: &mut SimRng) -> u32 {
        (0..self.count).map(|_| self.component(rng)).sum()
    }

    /// Batch of `n` independent trials
    ///
    /// Every element lies in `[count, count * sides]`.
    pub fn roll(&self, rng: &mut SimRng, n: usize) -> Vec<u32> {
        (0..n).map(|_| self.roll_one(rng)).collect()
    }

    /// Scalar sum of `n` single trials (`n = 0` yields 0)
    ///
    /// Used to accumulate level-up hit-die rolls and per-outcome damage dice.
    pub fn sum_of(&self, rng: &mut SimRng, n: usize) -> u32 {
        (0..n).map(|_| self.roll_one(rng)).sum()
    }

    /// Mean of `n` single trials, for descriptive reporting
    pub fn average_of(&self, rng: &mut SimRng, n: usize) -> f64 {
        if n == 0 {
            return 0.0;
        }
        self.sum_of(rng, n) as f64 / n as f64
    }

    /// Roll two batches of `n`, keeping the better of each pair
    pub fn roll_with_advantage(&self, rng: &mut SimRng, n: usize) -> Vec<u32> {
        let first = self.roll(rng, n);
        let second = self.roll(rng, n);
        first
            .into_iter()
            .zip(second)
            .map(|(a, b)| a.max(b))
            .collect()
    }

    /// Roll two batches of `n`, keeping the worse of each pair
    pub fn roll_with_disadvantage(&self, rng: &mut SimRng, n: usize) -> Vec<u32> {
        let first = self.roll(rng, n);
        let second = self.roll(rng, n);
        first
            .into_iter()
            .zip(second)
            .map(|(a, b)| a.min(b))
            .collect()
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)
    }
}
