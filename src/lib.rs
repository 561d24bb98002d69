//! skirmish - Monte Carlo simulator for d20-style tabletop combat
//!
//! Entities with derived combat statistics exchange batches of attacks and a
//! resolver decides, over many independent rounds, who wins an extended
//! exchange. Everything is vectorized: one call produces a whole batch of
//! trial results, and all randomness flows through an explicit seedable
//! handle so runs are reproducible.
//!
//! ```
//! use skirmish::{fight, monster, SimRng};
//!
//! let mut rng = SimRng::seed_from(42);
//! let mut wolf = monster("wolf", 3, None, &mut rng)?;
//! let mut troll = monster("troll", 7, None, &mut rng)?;
//! let outcome = fight(&mut wolf, &mut troll, &mut rng, 500)?;
//! println!("{}", outcome);
//! # Ok::<(), skirmish::SimError>(())
//! ```

pub mod combatant;
pub mod dice;
pub mod error;
pub mod fight;
pub mod generator;
pub mod rng;

pub use combatant::{
    ability_progression, AttackOutcome, AttackStyle, Combatant, CombatantBuilder, RollMode,
};
pub use dice::{Die, RerollRule};
pub use error::SimError;
pub use fight::{defeat_round, fight, FightOutcome};
pub use generator::{monster, MAX_CHALLENGE_RATING};
pub use rng::SimRng;
