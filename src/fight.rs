//! Fight resolution
//!
//! Runs the attack pipeline in both directions over a window of simulated
//! rounds, finds each side's defeat round from the cumulative incoming
//! damage, and picks a winner. Equal defeat rounds fall to an initiative
//! tie-break, re-rolled until strictly unequal; if neither side is defeated
//! within the window the fight is a tie.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::combatant::{Combatant, RollMode};
use crate::error::SimError;
use crate::rng::SimRng;

/// Result of a simulated fight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FightOutcome {
    /// Named side survived longer (or won the initiative tie-break)
    Winner(String),
    /// Neither side was defeated within the simulated window
    Tie,
}

impl fmt::Display for FightOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FightOutcome::Winner(name) => write!(f, "{}", name),
            FightOutcome::Tie => write!(f, "Tie"),
        }
    }
}

/// First round index at which cumulative damage reaches `hit_points`
///
/// Returns the sentinel `damage.len()` when the full cumulative sum never
/// gets there, meaning "not defeated within the simulated window".
pub fn defeat_round(hit_points: i32, damage: &[i32]) -> usize {
    let mut total: i64 = 0;
    for (round, dealt) in damage.iter().enumerate() {
        total += *dealt as i64;
        if total >= hit_points as i64 {
            return round;
        }
    }
    damage.len()
}

/// Simulate one extended exchange of `rounds` rounds between two combatants
///
/// Both sides attack every round; the side defeated later wins. The original
/// implementation computed the non-defeat tie but then let the initiative
/// branch overwrite it, making a tie unreachable; here the documented intent
/// wins and a double non-defeat is reported as [`FightOutcome::Tie`].
pub fn fight(
    a: &mut Combatant,
    b: &mut Combatant,
    rng: &mut SimRng,
    rounds: usize,
) -> Result<FightOutcome, SimError> {
    let a_damage = a.attack(b, rng, rounds, RollMode::Normal)?;
    let b_damage = b.attack(a, rng, rounds, RollMode::Normal)?;

    let a_hit_points = a.hit_points(rng)?;
    let b_hit_points = b.hit_points(rng)?;
    let a_defeated = defeat_round(a_hit_points, &b_damage);
    let b_defeated = defeat_round(b_hit_points, &a_damage);

    debug!(
        a = %a.name(),
        b = %b.name(),
        a_defeated,
        b_defeated,
        rounds,
        "defeat rounds computed"
    );

    if a_defeated == rounds && b_defeated == rounds {
        return Ok(FightOutcome::Tie);
    }

    // tie-break needs strict inequality
    while a.initiative() == b.initiative() {
        a.roll_initiative(rng);
        b.roll_initiative(rng);
    }

    let a_wins = a_defeated > b_defeated
        || (a_defeated == b_defeated && a.initiative() > b.initiative());
    let winner = if a_wins { a.name().to_string() } else { b.name().to_string() };
    Ok(FightOutcome::Winner(winner))
}
