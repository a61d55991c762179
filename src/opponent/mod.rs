//! Opponent policy — a stochastic pick of pitch and tier. No learning, no search.
//!
//! The pitch aims at the wind or the birds (coin flip); the tier comes from a
//! weighted table that turns more aggressive once the match reaches
//! `late_from_turn`.

use crate::config::OpponentConfig;
use crate::dice::RandomSource;
use crate::tone::{EnvironmentState, MelodySelection, Tone, TONE_COUNT};

/// Resolve a target rank to a tone, or a uniformly random tone if the rank
/// is off the scale. Ranks from a [`Tone`] always resolve; the fallback is
/// for raw ranks handed in by callers outside the crate.
pub fn resolve_pitch(target: usize, dice: &mut dyn RandomSource) -> Tone {
    Tone::from_index(target).unwrap_or_else(|| Tone::ALL[dice.pick(TONE_COUNT)])
}

/// The opponent's decision procedure.
#[derive(Debug, Clone)]
pub struct OpponentPolicy {
    config: OpponentConfig,
}

impl OpponentPolicy {
    pub fn new(config: OpponentConfig) -> Self {
        Self { config }
    }

    /// Tier weights in force on `turn_number`.
    pub fn weights_for(&self, turn_number: u32) -> &[f64; 4] {
        if turn_number >= self.config.late_from_turn {
            &self.config.late_weights
        } else {
            &self.config.opening_weights
        }
    }

    /// Choose this turn's selection.
    ///
    /// Draw order: one coin flip for the target tone, one weighted roll for
    /// the tier.
    pub fn choose(
        &self,
        env: &EnvironmentState,
        turn_number: u32,
        dice: &mut dyn RandomSource,
    ) -> MelodySelection {
        let target = if dice.chance(0.5) { env.wind } else { env.birds };
        // Always on the scale here, so this never draws.
        let pitch = resolve_pitch(target.index(), dice);
        let tier = dice.weighted(self.weights_for(turn_number)) as u8;
        MelodySelection { pitch, tier }
    }
}

impl Default for OpponentPolicy {
    fn default() -> Self {
        Self::new(OpponentConfig::default())
    }
}
