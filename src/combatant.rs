//! Combatant model and attack pipeline
//!
//! A combatant holds a small set of base attributes and derives everything
//! combat-relevant from them:
//! - `hit_bonus` from strength and level (by way of the proficiency bonus)
//! - `hit_points` from the hit die, level, and constitution — re-sampled on
//!   every read, so repeated reads model level-up variance
//! - per-trial damage from a batch of d20 attack rolls
//!
//! Attack styles are capability tags injected into the damage step rather
//! than subtypes; the pipeline itself is shared.

use serde::{Deserialize, Serialize};

use crate::dice::Die;
use crate::error::SimError;
use crate::rng::SimRng;

/// Outcome of a single attack trial
///
/// The variant order doubles as the number of damage dice rolled: a miss
/// rolls none, a hit rolls the damage dice once, a critical rolls them twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackOutcome {
    Miss,
    Hit,
    Critical,
}

impl AttackOutcome {
    /// How many times the damage dice are rolled for this outcome
    pub fn dice_rolled(&self) -> u32 {
        match self {
            AttackOutcome::Miss => 0,
            AttackOutcome::Hit => 1,
            AttackOutcome::Critical => 2,
        }
    }
}

/// How the attack d20 is sampled
///
/// Advantage and disadvantage are mutually exclusive by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RollMode {
    #[default]
    Normal,
    /// Roll twice, keep the better
    Advantage,
    /// Roll twice, keep the worse
    Disadvantage,
}

/// Damage-model specialization applied on top of the shared attack pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AttackStyle {
    /// Damage bonus is the strength modifier, nothing extra on a critical
    #[default]
    Standard,
    /// Escalating flat damage bonus (rage), extra level-scaled dice on a
    /// critical (brutal critical), and optionally the reroll-low rule on the
    /// damage dice (great weapon fighting)
    Berserker { great_weapon_fighting: bool },
}

/// An entity that can attack and be attacked
///
/// Attributes are fixed at construction: the builder folds style adjustments
/// (rage bonus, capstone) into the stored values, so the fields stay private
/// and read-only to keep the folded bonuses consistent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    name: String,
    level: u32,
    armor_class: i32,
    strength_modifier: i32,
    constitution_modifier: i32,
    initiative_bonus: i32,
    damage_bonus: i32,
    style: AttackStyle,
    hit_die: Option<Die>,
    damage_dice: Option<Die>,
    initiative: i32,
}

/// Builder for [`Combatant`]
///
/// `build` samples initiative and applies style adjustments, so it takes the
/// random source.
#[derive(Debug, Clone)]
pub struct CombatantBuilder {
    name: String,
    level: u32,
    armor_class: i32,
    strength_modifier: i32,
    constitution_modifier: i32,
    initiative_bonus: i32,
    hit_die: Option<Die>,
    damage_dice: Option<Die>,
    style: AttackStyle,
}

/// Strength/constitution modifiers for a martial character of the given
/// level, assuming a +3/+2 start and alternating ability improvements at
/// levels 4, 6, 8, 12, and 14
pub fn ability_progression(level: u32) -> (i32, i32) {
    let (str_gain, con_gain) = match level {
        0..=3 => (0, 0),
        4..=5 => (1, 0),
        6..=7 => (1, 1),
        8..=11 => (2, 1),
        12..=13 => (2, 2),
        _ => (2, 3),
    };
    (3 + str_gain, 2 + con_gain)
}

impl CombatantBuilder {
    /// Start a builder with neutral defaults: level 1, armor class 10, all
    /// modifiers 0, no dice configured
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: 1,
            armor_class: 10,
            strength_modifier: 0,
            constitution_modifier: 0,
            initiative_bonus: 0,
            hit_die: None,
            damage_dice: None,
            style: AttackStyle::Standard,
        }
    }

    /// Set the level (values below 1 are raised to 1)
    pub fn level(mut self, level: u32) -> Self {
        self.level = level.max(1);
        self
    }

    pub fn armor_class(mut self, armor_class: i32) -> Self {
        self.armor_class = armor_class;
        self
    }

    pub fn strength_modifier(mut self, modifier: i32) -> Self {
        self.strength_modifier = modifier;
        self
    }

    pub fn constitution_modifier(mut self, modifier: i32) -> Self {
        self.constitution_modifier = modifier;
        self
    }

    pub fn initiative_bonus(mut self, bonus: i32) -> Self {
        self.initiative_bonus = bonus;
        self
    }

    pub fn hit_die(mut self, die: Die) -> Self {
        self.hit_die = Some(die);
        self
    }

    pub fn damage_dice(mut self, dice: Die) -> Self {
        self.damage_dice = Some(dice);
        self
    }

    /// Use the berserker damage model (rage bonus plus brutal critical)
    ///
    /// Berserkers always use a d12 hit die; setting one separately is not
    /// needed.
    pub fn berserker(mut self, great_weapon_fighting: bool) -> Self {
        self.style = AttackStyle::Berserker {
            great_weapon_fighting,
        };
        self
    }

    /// Derive strength and constitution from [`ability_progression`] for the
    /// currently set level (call after `level`)
    pub fn fighter_progression(mut self) -> Self {
        let (strength, constitution) = ability_progression(self.level);
        self.strength_modifier = strength;
        self.constitution_modifier = constitution;
        self
    }

    /// Finalize the combatant: apply style adjustments, fold the damage
    /// bonus, and roll initiative
    pub fn build(self, rng: &mut SimRng) -> Combatant {
        let mut strength = self.strength_modifier;
        let mut constitution = self.constitution_modifier;
        let mut hit_die = self.hit_die;

        if let AttackStyle::Berserker { .. } = self.style {
            // capstone: +2 strength and constitution at level 20
            if self.level == 20 {
                strength += 2;
                constitution += 2;
            }
            hit_die = Some(Die::d12());
        }

        let damage_bonus = match self.style {
            AttackStyle::Standard => strength,
            AttackStyle::Berserker { .. } => strength + rage_bonus(self.level),
        };

        let mut combatant = Combatant {
            name: self.name,
            level: self.level,
            armor_class: self.armor_class,
            strength_modifier: strength,
            constitution_modifier: constitution,
            initiative_bonus: self.initiative_bonus,
            damage_bonus,
            style: self.style,
            hit_die,
            damage_dice: self.damage_dice,
            initiative: 0,
        };
        combatant.roll_initiative(rng);
        combatant
    }
}

/// Flat rage damage bonus by level band
fn rage_bonus(level: u32) -> i32 {
    match level {
        0..=8 => 2,
        9..=15 => 3,
        _ => 4,
    }
}

/// Extra single damage dice rolled on a critical, by level band
fn brutal_critical_dice(level: u32) -> u32 {
    match level {
        0..=8 => 0,
        9..=12 => 1,
        13..=16 => 2,
        _ => 3,
    }
}

impl Combatant {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Level, or challenge rating for generated monsters (always >= 1)
    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn armor_class(&self) -> i32 {
        self.armor_class
    }

    pub fn strength_modifier(&self) -> i32 {
        self.strength_modifier
    }

    pub fn constitution_modifier(&self) -> i32 {
        self.constitution_modifier
    }

    pub fn initiative_bonus(&self) -> i32 {
        self.initiative_bonus
    }

    /// Strength modifier plus any construction-time style adjustment
    pub fn damage_bonus(&self) -> i32 {
        self.damage_bonus
    }

    /// Static modifier added to every attack roll: strength plus the
    /// level-derived proficiency bonus
    pub fn hit_bonus(&self) -> i32 {
        let proficiency_bonus = (self.level as i32 + 3) / 4 + 1;
        self.strength_modifier + proficiency_bonus
    }

    /// Damage a combatant can take before being defeated
    ///
    /// Re-sampled on every read: full hit die at level 1, one roll per level
    /// beyond that, plus the constitution modifier per level.
    pub fn hit_points(&self, rng: &mut SimRng) -> Result<i32, SimError> {
        let hit_die = self.hit_die()?;
        let level_up_rolls = hit_die.sum_of(rng, (self.level as usize).saturating_sub(1));
        Ok(hit_die.sides() as i32
            + level_up_rolls as i32
            + self.constitution_modifier * self.level as i32)
    }

    /// The configured hit die, or a configuration error when unset
    pub fn hit_die(&self) -> Result<Die, SimError> {
        self.hit_die.ok_or(SimError::HitDieNotSet)
    }

    /// The configured damage dice, or a configuration error when unset
    ///
    /// Great-weapon-fighting berserkers get the reroll-low variant of the
    /// configured dice.
    pub fn damage_dice(&self) -> Result<Die, SimError> {
        let dice = self.damage_dice.ok_or(SimError::DamageDiceNotSet)?;
        match self.style {
            AttackStyle::Berserker {
                great_weapon_fighting: true,
            } => Ok(dice.with_reroll_low()),
            _ => Ok(dice),
        }
    }

    /// The attack style in effect
    pub fn style(&self) -> AttackStyle {
        self.style
    }

    /// The initiative value sampled at construction (or last re-roll)
    pub fn initiative(&self) -> i32 {
        self.initiative
    }

    /// Re-sample initiative: d20 plus the initiative bonus
    pub fn roll_initiative(&mut self, rng: &mut SimRng) {
        self.initiative = Die::d20().roll_one(rng) as i32 + self.initiative_bonus;
    }

    /// Resolve `trials` to-hit rolls against a target
    ///
    /// Natural 20s and natural 1s are recognized from the modified total
    /// (the bonus is added to every roll, so `20 + hit_bonus` can only be a
    /// natural 20) and short-circuit the armor-class comparison: a natural
    /// 20 is always a critical, a natural 1 is always a miss.
    pub fn hit(
        &self,
        target: &Combatant,
        rng: &mut SimRng,
        trials: usize,
        mode: RollMode,
    ) -> Vec<AttackOutcome> {
        let hit_bonus = self.hit_bonus();
        let natural_20 = 20 + hit_bonus;
        let natural_1 = 1 + hit_bonus;
        let d20 = Die::d20();

        let rolls = match mode {
            RollMode::Normal => d20.roll(rng, trials),
            RollMode::Advantage => d20.roll_with_advantage(rng, trials),
            RollMode::Disadvantage => d20.roll_with_disadvantage(rng, trials),
        };

        rolls
            .into_iter()
            .map(|roll| {
                let total = roll as i32 + hit_bonus;
                if total == natural_20 {
                    AttackOutcome::Critical
                } else if total == natural_1 {
                    AttackOutcome::Miss
                } else if total >= target.armor_class {
                    AttackOutcome::Hit
                } else {
                    AttackOutcome::Miss
                }
            })
            .collect()
    }

    /// Convert a batch of attack outcomes into per-trial damage totals
    ///
    /// Each trial rolls the damage dice once per outcome step and adds the
    /// damage bonus the same number of times, so a miss deals exactly 0 and
    /// a critical doubles both. Berserkers additionally roll their
    /// level-scaled extra dice on every critical trial.
    pub fn damage(
        &self,
        rng: &mut SimRng,
        outcomes: &[AttackOutcome],
    ) -> Result<Vec<i32>, SimError> {
        let dice = self.damage_dice()?;
        let extra_dice = match self.style {
            AttackStyle::Berserker { .. } => brutal_critical_dice(self.level),
            AttackStyle::Standard => 0,
        };
        let extra_die = dice.single();

        let mut totals = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            let rolled = outcome.dice_rolled();
            let mut total =
                dice.sum_of(rng, rolled as usize) as i32 + self.damage_bonus * rolled as i32;
            if rolled >= 2 && extra_dice > 0 {
                total +=
                    (rolled as i32 - 1) * extra_die.sum_of(rng, extra_dice as usize) as i32;
            }
            totals.push(total);
        }
        Ok(totals)
    }

    /// Full attack pipeline: to-hit resolution, then damage resolution
    pub fn attack(
        &self,
        target: &Combatant,
        rng: &mut SimRng,
        trials: usize,
        mode: RollMode,
    ) -> Result<Vec<i32>, SimError> {
        let outcomes = self.hit(target, rng, trials, mode);
        self.damage(rng, &outcomes)
    }

    /// Human-readable character sheet
    ///
    /// Takes the random source because hit points re-sample on read.
    pub fn stat_block(&self, rng: &mut SimRng) -> Result<String, SimError> {
        Ok(format!(
            "---Combatant---\n\
             Name: {}\n\
             Level: {}\n\
             Hit Points: {}\n\
             AC: {}\n\
             Damage Dice: {}\n\
             Hit Die: {}\n\
             Hit Bonus: {}\n\
             Damage Bonus: {}\n\
             Constitution Modifier: {}\n\
             Initiative: {}",
            self.name,
            self.level,
            self.hit_points(rng)?,
            self.armor_class,
            self.damage_dice()?,
            self.hit_die()?,
            self.hit_bonus(),
            self.damage_bonus,
            self.constitution_modifier,
            self.initiative,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic(rng: &mut SimRng) -> Combatant {
        CombatantBuilder::new("fighter")
            .level(5)
            .armor_class(16)
            .strength_modifier(3)
            .constitution_modifier(2)
            .hit_die(Die::new(10, 1).unwrap())
            .damage_dice(Die::new(6, 2).unwrap())
            .build(rng)
    }

    #[test]
    fn test_hit_bonus() {
        let mut rng = SimRng::seed_from(1);
        // level 5: proficiency ceil(5/4) + 1 = 3, plus strength 3
        assert_eq!(basic(&mut rng).hit_bonus(), 6);

        let level_1 = CombatantBuilder::new("novice")
            .strength_modifier(2)
            .build(&mut rng);
        // level 1: proficiency 2, plus strength 2
        assert_eq!(level_1.hit_bonus(), 4);
    }

    #[test]
    fn test_level_one_hit_points_exact() {
        let mut rng = SimRng::seed_from(2);
        let combatant = CombatantBuilder::new("novice")
            .constitution_modifier(3)
            .hit_die(Die::new(8, 1).unwrap())
            .build(&mut rng);
        // no level-up rolls at level 1
        assert_eq!(combatant.hit_points(&mut rng).unwrap(), 11);
    }

    #[test]
    fn test_hit_points_resample_on_read() {
        let mut rng = SimRng::seed_from(3);
        let combatant = CombatantBuilder::new("veteran")
            .level(20)
            .hit_die(Die::new(12, 1).unwrap())
            .build(&mut rng);
        let reads: Vec<i32> = (0..10)
            .map(|_| combatant.hit_points(&mut rng).unwrap())
            .collect();
        for &hp in &reads {
            // 12 + 19 rolls of 1d12
            assert!((31..=240).contains(&hp), "hp {} out of bounds", hp);
        }
        assert!(
            reads.iter().any(|&hp| hp != reads[0]),
            "20 level-up rolls produced 10 identical reads"
        );
    }

    #[test]
    fn test_unset_dice_are_configuration_errors() {
        let mut rng = SimRng::seed_from(4);
        let combatant = CombatantBuilder::new("bare").build(&mut rng);
        assert_eq!(combatant.hit_die(), Err(SimError::HitDieNotSet));
        assert_eq!(combatant.damage_dice(), Err(SimError::DamageDiceNotSet));
        assert!(combatant.hit_points(&mut rng).is_err());
        let target = CombatantBuilder::new("target").build(&mut rng);
        assert!(combatant
            .attack(&target, &mut rng, 10, RollMode::Normal)
            .is_err());
    }

    #[test]
    fn test_natural_one_always_misses() {
        let mut rng = SimRng::seed_from(5);
        let attacker = basic(&mut rng);
        // armor class far below every possible total: only natural 1s miss
        let helpless = CombatantBuilder::new("helpless")
            .armor_class(-100)
            .build(&mut rng);
        let outcomes = attacker.hit(&helpless, &mut rng, 20_000, RollMode::Normal);
        let misses = outcomes
            .iter()
            .filter(|o| **o == AttackOutcome::Miss)
            .count();
        assert!(misses > 0, "no natural 1s in 20k rolls");
        assert!(
            misses < 20_000 / 10,
            "misses {} far above the 1-in-20 natural-1 rate",
            misses
        );
    }

    #[test]
    fn test_natural_twenty_always_crits() {
        let mut rng = SimRng::seed_from(6);
        let attacker = basic(&mut rng);
        // armor class no total can reach: only natural 20s land
        let fortress = CombatantBuilder::new("fortress")
            .armor_class(100)
            .build(&mut rng);
        let outcomes = attacker.hit(&fortress, &mut rng, 20_000, RollMode::Normal);
        assert!(!outcomes.contains(&AttackOutcome::Hit));
        let crits = outcomes
            .iter()
            .filter(|o| **o == AttackOutcome::Critical)
            .count();
        assert!(crits > 0, "no natural 20s in 20k rolls");
        assert!(crits < 20_000 / 10);
    }

    #[test]
    fn test_miss_deals_zero() {
        let mut rng = SimRng::seed_from(7);
        let attacker = basic(&mut rng);
        let damage = attacker
            .damage(&mut rng, &[AttackOutcome::Miss; 50])
            .unwrap();
        assert!(damage.iter().all(|&d| d == 0));
    }

    #[test]
    fn test_critical_doubles_dice_and_bonus() {
        let mut rng = SimRng::seed_from(8);
        // 2d1 damage dice make every roll deterministic
        let attacker = CombatantBuilder::new("certain")
            .strength_modifier(3)
            .damage_dice(Die::new(1, 2).unwrap())
            .build(&mut rng);
        let damage = attacker
            .damage(
                &mut rng,
                &[AttackOutcome::Hit, AttackOutcome::Critical, AttackOutcome::Miss],
            )
            .unwrap();
        // hit: 2 + 3, critical: 4 + 6, miss: 0
        assert_eq!(damage, vec![5, 10, 0]);
    }

    #[test]
    fn test_rage_bonus_bands() {
        let mut rng = SimRng::seed_from(9);
        for (level, expected) in [(1, 2), (8, 2), (9, 3), (15, 3), (16, 4)] {
            let berserker = CombatantBuilder::new("rager")
                .level(level)
                .strength_modifier(3)
                .damage_dice(Die::new(6, 2).unwrap())
                .berserker(false)
                .build(&mut rng);
            assert_eq!(
                berserker.damage_bonus(),
                3 + expected,
                "wrong rage bonus at level {}",
                level
            );
        }
    }

    #[test]
    fn test_berserker_capstone() {
        let mut rng = SimRng::seed_from(10);
        let berserker = CombatantBuilder::new("primal")
            .level(20)
            .strength_modifier(5)
            .constitution_modifier(5)
            .damage_dice(Die::new(12, 1).unwrap())
            .berserker(false)
            .build(&mut rng);
        assert_eq!(berserker.strength_modifier(), 7);
        assert_eq!(berserker.constitution_modifier(), 7);
        // damage bonus: strength 7 plus rage 4
        assert_eq!(berserker.damage_bonus(), 11);
        assert_eq!(berserker.hit_die().unwrap().sides(), 12);
    }

    #[test]
    fn test_brutal_critical_extra_dice() {
        let mut rng = SimRng::seed_from(11);
        // 2d1 dice again: critical = 2 dice + 2x bonus + extra 1d1 rolls
        for (level, extra) in [(8, 0), (9, 1), (13, 2), (17, 3)] {
            let berserker = CombatantBuilder::new("brutal")
                .level(level)
                .strength_modifier(0)
                .damage_dice(Die::new(1, 2).unwrap())
                .berserker(false)
                .build(&mut rng);
            let rage = berserker.damage_bonus();
            let damage = berserker
                .damage(&mut rng, &[AttackOutcome::Critical])
                .unwrap();
            assert_eq!(
                damage[0],
                4 + 2 * rage + extra,
                "wrong critical damage at level {}",
                level
            );
        }
    }

    #[test]
    fn test_great_weapon_fighting_rerolls() {
        let mut rng = SimRng::seed_from(12);
        let berserker = CombatantBuilder::new("gwf")
            .level(9)
            .damage_dice(Die::new(6, 2).unwrap())
            .berserker(true)
            .build(&mut rng);
        assert_eq!(
            berserker.damage_dice().unwrap().reroll_rule(),
            crate::dice::RerollRule::RerollLowOnce
        );
    }

    #[test]
    fn test_ability_progression_bands() {
        assert_eq!(ability_progression(1), (3, 2));
        assert_eq!(ability_progression(4), (4, 2));
        assert_eq!(ability_progression(6), (4, 3));
        assert_eq!(ability_progression(8), (5, 3));
        assert_eq!(ability_progression(12), (5, 4));
        assert_eq!(ability_progression(14), (5, 5));
        assert_eq!(ability_progression(20), (5, 5));
    }

    #[test]
    fn test_initiative_rerolls() {
        let mut rng = SimRng::seed_from(13);
        let mut combatant = CombatantBuilder::new("quick")
            .initiative_bonus(4)
            .build(&mut rng);
        for _ in 0..100 {
            combatant.roll_initiative(&mut rng);
            assert!((5..=24).contains(&combatant.initiative()));
        }
    }

    #[test]
    fn test_stat_block() {
        let mut rng = SimRng::seed_from(14);
        let sheet = basic(&mut rng).stat_block(&mut rng).unwrap();
        assert!(sheet.contains("Name: fighter"));
        assert!(sheet.contains("Level: 5"));
        assert!(sheet.contains("Damage Dice: 2d6"));
        assert!(sheet.contains("Hit Die: 1d10"));
    }
}
