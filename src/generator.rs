//! Procedural attribute generation
//!
//! Samples monster attributes from a challenge rating. Every chooser indexes
//! an ordered option list with one draw from a triangular distribution whose
//! bounds track the challenge rating:
//! - top index is capped at `cr + 5` (and the end of the list)
//! - bottom index is floored at `cr - 5` (and 0), forced below the top
//! - the mode is the challenge rating scaled onto the list
//!
//! Low ratings therefore concentrate on weak options and high ratings on
//! strong ones, with the spread tightening near the list boundaries but
//! never collapsing to a single choice.

use tracing::debug;

use crate::combatant::{Combatant, CombatantBuilder};
use crate::dice::Die;
use crate::error::SimError;
use crate::rng::SimRng;

/// Difficulty ceiling; ratings above this are rejected, never clamped
pub const MAX_CHALLENGE_RATING: u32 = 20;

/// How far the sampled index may stray from the challenge rating
const CR_SPREAD: u32 = 5;

/// Pick one entry from an ordered option list, biased by challenge rating
fn choose_value<T: Copy>(rng: &mut SimRng, cr: u32, options: &[T]) -> Result<T, SimError> {
    if cr > MAX_CHALLENGE_RATING {
        return Err(SimError::ChallengeRatingTooHigh(cr));
    }
    let top = options.len() - 1;
    let max_index = top.min((cr + CR_SPREAD) as usize);
    // forced below max_index so the triangle stays valid even for short lists
    let min_index = (cr.saturating_sub(CR_SPREAD) as usize).min(max_index.saturating_sub(1));
    let mode = (cr as f64 * max_index as f64 / MAX_CHALLENGE_RATING as f64)
        .clamp(min_index as f64, max_index as f64);

    let sample = rng.triangular(min_index as f64, mode, max_index as f64);
    let index = (sample.round() as i64).clamp(0, top as i64) as usize;
    Ok(options[index])
}

/// Hit die for a monster: d6 through d12
pub fn choose_hit_die(rng: &mut SimRng, cr: u32) -> Result<Die, SimError> {
    let options = [
        Die::new(6, 1)?,
        Die::new(8, 1)?,
        Die::new(10, 1)?,
        Die::new(12, 1)?,
    ];
    choose_value(rng, cr, &options)
}

/// Constitution modifier, -2 through +7
pub fn choose_constitution_modifier(rng: &mut SimRng, cr: u32) -> Result<i32, SimError> {
    let options: Vec<i32> = (-2..8).collect();
    choose_value(rng, cr, &options)
}

/// Strength modifier, -2 through +7
pub fn choose_strength_modifier(rng: &mut SimRng, cr: u32) -> Result<i32, SimError> {
    let options: Vec<i32> = (-2..8).collect();
    choose_value(rng, cr, &options)
}

/// Armor class, 10 through 21
pub fn choose_armor_class(rng: &mut SimRng, cr: u32) -> Result<i32, SimError> {
    let options: Vec<i32> = (10..22).collect();
    choose_value(rng, cr, &options)
}

/// Initiative bonus, -2 through +8
pub fn choose_initiative_bonus(rng: &mut SimRng, cr: u32) -> Result<i32, SimError> {
    let options: Vec<i32> = (-2..9).collect();
    choose_value(rng, cr, &options)
}

/// Damage dice, ordered by ascending expected value before indexing
pub fn choose_damage_dice(rng: &mut SimRng, cr: u32) -> Result<Die, SimError> {
    let mut options = [4, 6, 8, 10, 12]
        .into_iter()
        .map(|sides| Die::new(sides, 1))
        .collect::<Result<Vec<Die>, SimError>>()?;
    options.sort_by_key(|die| die.count() * (die.sides() + 1));
    choose_value(rng, cr, &options)
}

/// Generate a monster: every attribute is sampled from the challenge rating
///
/// An explicit `armor_class` overrides the sampled value. The monster's
/// level is its challenge rating (floored at 1 so hit points stay defined).
pub fn monster(
    name: impl Into<String>,
    cr: u32,
    armor_class: Option<i32>,
    rng: &mut SimRng,
) -> Result<Combatant, SimError> {
    let name = name.into();
    let sampled_ac = match armor_class {
        Some(ac) => ac,
        None => choose_armor_class(rng, cr)?,
    };
    let hit_die = choose_hit_die(rng, cr)?;
    let damage_dice = choose_damage_dice(rng, cr)?;
    let strength = choose_strength_modifier(rng, cr)?;
    let constitution = choose_constitution_modifier(rng, cr)?;
    let initiative_bonus = choose_initiative_bonus(rng, cr)?;

    debug!(
        %name,
        cr,
        armor_class = sampled_ac,
        strength,
        constitution,
        initiative_bonus,
        hit_die = %hit_die,
        damage_dice = %damage_dice,
        "generated monster"
    );

    Ok(CombatantBuilder::new(name)
        .level(cr.max(1))
        .armor_class(sampled_ac)
        .strength_modifier(strength)
        .constitution_modifier(constitution)
        .initiative_bonus(initiative_bonus)
        .hit_die(hit_die)
        .damage_dice(damage_dice)
        .build(rng))
}
