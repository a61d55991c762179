//! Environment — the wind and birds tones the acting combatant plays against.

use serde::{Deserialize, Serialize};

use super::{Tone, TONE_COUNT};
use crate::dice::RandomSource;

/// The two environmental tones visible during a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentState {
    pub wind: Tone,
    pub birds: Tone,
}

impl EnvironmentState {
    /// Build an environment from explicit tones.
    pub fn new(wind: Tone, birds: Tone) -> Self {
        Self { wind, birds }
    }

    /// Roll a fresh environment. Wind is drawn first, then birds; each is
    /// uniform over all tones and the two may coincide.
    pub fn regenerate(dice: &mut dyn RandomSource) -> Self {
        let wind = Tone::ALL[dice.pick(TONE_COUNT)];
        let birds = Tone::ALL[dice.pick(TONE_COUNT)];
        Self { wind, birds }
    }

    /// Whether `pitch` matches either environmental tone.
    pub fn resonates_with(&self, pitch: Tone) -> bool {
        pitch == self.wind || pitch == self.birds
    }
}

impl Default for EnvironmentState {
    fn default() -> Self {
        Self::new(Tone::Medio, Tone::Medio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::{ScriptedDice, SeededDice};

    #[test]
    fn regenerate_draws_wind_then_birds() {
        let mut dice = ScriptedDice::new([0.0, 0.8]);
        let env = EnvironmentState::regenerate(&mut dice);
        assert_eq!(env.wind, Tone::Grave);
        assert_eq!(env.birds, Tone::Ethereal);
        assert_eq!(dice.drawn(), 2);
    }

    #[test]
    fn wind_and_birds_may_coincide() {
        let mut dice = ScriptedDice::new([0.3, 0.3]);
        let env = EnvironmentState::regenerate(&mut dice);
        assert_eq!(env.wind, env.birds);
    }

    #[test]
    fn regenerate_reaches_every_tone() {
        let mut dice = SeededDice::new(11);
        let mut seen = [false; TONE_COUNT];
        for _ in 0..500 {
            let env = EnvironmentState::regenerate(&mut dice);
            seen[env.wind.index()] = true;
            seen[env.birds.index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn resonance_checks_both_tones() {
        let env = EnvironmentState::new(Tone::Grave, Tone::Alto);
        assert!(env.resonates_with(Tone::Grave));
        assert!(env.resonates_with(Tone::Alto));
        assert!(!env.resonates_with(Tone::Medio));
    }
}
