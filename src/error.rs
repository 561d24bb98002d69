//! Simulation error types

use thiserror::Error;

/// Errors raised by the simulation core
///
/// All of these signal caller mistakes and are raised synchronously at the
/// point of misuse. There is no partial or degraded mode.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SimError {
    /// Die constructed with zero sides or zero dice
    #[error("invalid die {count}d{sides}: sides and count must be at least 1")]
    InvalidDie { sides: u32, count: u32 },

    /// Challenge rating above the supported ceiling
    #[error("challenge rating {0} not supported (maximum is 20)")]
    ChallengeRatingTooHigh(u32),

    /// Damage dice read before being configured
    #[error("no damage dice configured")]
    DamageDiceNotSet,

    /// Hit die read before being configured
    #[error("no hit die configured")]
    HitDieNotSet,
}
