//! Battle configuration — every tunable rule constant, loaded from
//! ~/.symphony-skirmish/battle.yaml.
//!
//! All fields default individually, so a partial YAML file only overrides
//! what it names.

pub mod error;
pub mod persistence;

use serde::{Deserialize, Serialize};

pub use error::{ConfigError, ConfigErrorKind};
pub use persistence::{default_config_path, load_config, reset_config, save_config};

use crate::weather::PowerUpKind;

/// Allowed range for the per-turn timer, in milliseconds.
pub const TURN_TIMER_RANGE_MS: (u64, u64) = (7_000, 15_000);
/// Allowed range for the pause before the opponent acts, in milliseconds.
pub const AI_DELAY_RANGE_MS: (u64, u64) = (500, 1_000);
/// Highest starting health a config may set.
pub const HEALTH_CAP: u32 = 100;
/// Most perfect harmonies a match may ever award.
pub const PERFECT_HARMONY_CAP: u32 = 3;

/// Turn counts for each power-up kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpDurations {
    pub wind_gust: u32,
    pub bird_flock: u32,
    pub musical_echo: u32,
}

impl PowerUpDurations {
    /// Duration for a given kind.
    pub fn for_kind(&self, kind: PowerUpKind) -> u32 {
        match kind {
            PowerUpKind::WindGust => self.wind_gust,
            PowerUpKind::BirdFlock => self.bird_flock,
            PowerUpKind::MusicalEcho => self.musical_echo,
        }
    }
}

impl Default for PowerUpDurations {
    fn default() -> Self {
        Self {
            wind_gust: 2,
            bird_flock: 3,
            musical_echo: 1,
        }
    }
}

/// Opponent tier weights, indexed by tier 0..=3.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpponentConfig {
    /// Weights used before `late_from_turn`.
    pub opening_weights: [f64; 4],
    /// Weights used from `late_from_turn` onwards.
    pub late_weights: [f64; 4],
    pub late_from_turn: u32,
}

impl Default for OpponentConfig {
    fn default() -> Self {
        Self {
            opening_weights: [0.0, 40.0, 40.0, 20.0],
            late_weights: [0.0, 30.0, 40.0, 30.0],
            late_from_turn: 4,
        }
    }
}

/// All rule constants for a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Per-turn budget before the player's turn auto-resolves.
    pub turn_timer_ms: u64,
    /// Pacing pause between the player's resolution and the opponent's move.
    pub ai_delay_ms: u64,
    pub max_health: u32,
    pub max_perfect_harmonies: u32,
    /// Resolutions during which a further perfect harmony is refused.
    pub perfect_cooldown_turns: u32,
    /// Harmony needed to keep a combo alive.
    pub success_threshold: u32,
    /// Harmony needed to record a successful pitch and roll for a power-up.
    pub power_up_threshold: u32,
    pub power_up_chance: f64,
    pub stun_chance: f64,
    /// Combo count that triggers a finisher.
    pub finisher_combo: u32,
    pub finisher_multiplier: f64,
    /// Finisher multiplier when harmony is at least 80.
    pub finisher_strong_multiplier: f64,
    pub finisher_flat_bonus: u32,
    pub wind_gust_multiplier: f64,
    pub perfect_multiplier: f64,
    pub perfect_heal: u32,
    pub brilliant_multiplier: f64,
    pub brilliant_heal: u32,
    pub strong_bonus: u32,
    pub power_up_durations: PowerUpDurations,
    pub opponent: OpponentConfig,
    /// Capacity of the outcome journal ring buffer.
    pub journal_capacity: usize,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            turn_timer_ms: 10_000,
            ai_delay_ms: 800,
            max_health: 100,
            max_perfect_harmonies: 3,
            perfect_cooldown_turns: 3,
            success_threshold: 50,
            power_up_threshold: 60,
            power_up_chance: 0.15,
            stun_chance: 0.5,
            finisher_combo: 4,
            finisher_multiplier: 1.5,
            finisher_strong_multiplier: 1.8,
            finisher_flat_bonus: 4,
            wind_gust_multiplier: 1.5,
            perfect_multiplier: 1.7,
            perfect_heal: 5,
            brilliant_multiplier: 1.4,
            brilliant_heal: 2,
            strong_bonus: 3,
            power_up_durations: PowerUpDurations::default(),
            opponent: OpponentConfig::default(),
            journal_capacity: 16,
        }
    }
}

impl BattleConfig {
    /// Check every constant against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (lo, hi) = TURN_TIMER_RANGE_MS;
        if !(lo..=hi).contains(&self.turn_timer_ms) {
            return Err(ConfigError::invalid(format!(
                "turn_timer_ms must be within {lo}..={hi}, got {}",
                self.turn_timer_ms
            )));
        }
        let (lo, hi) = AI_DELAY_RANGE_MS;
        if !(lo..=hi).contains(&self.ai_delay_ms) {
            return Err(ConfigError::invalid(format!(
                "ai_delay_ms must be within {lo}..={hi}, got {}",
                self.ai_delay_ms
            )));
        }
        if !(1..=HEALTH_CAP).contains(&self.max_health) {
            return Err(ConfigError::invalid(format!(
                "max_health must be within 1..={HEALTH_CAP}, got {}",
                self.max_health
            )));
        }
        if self.max_perfect_harmonies > PERFECT_HARMONY_CAP {
            return Err(ConfigError::invalid(format!(
                "max_perfect_harmonies must be at most {PERFECT_HARMONY_CAP}, got {}",
                self.max_perfect_harmonies
            )));
        }
        for (name, p) in [
            ("power_up_chance", self.power_up_chance),
            ("stun_chance", self.stun_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::invalid(format!(
                    "{name} must be a probability in 0..=1, got {p}"
                )));
            }
        }
        for (name, m) in [
            ("finisher_multiplier", self.finisher_multiplier),
            ("finisher_strong_multiplier", self.finisher_strong_multiplier),
            ("wind_gust_multiplier", self.wind_gust_multiplier),
            ("perfect_multiplier", self.perfect_multiplier),
            ("brilliant_multiplier", self.brilliant_multiplier),
        ] {
            if !m.is_finite() || m < 1.0 {
                return Err(ConfigError::invalid(format!(
                    "{name} must be at least 1.0, got {m}"
                )));
            }
        }
        if self.finisher_combo < 2 {
            return Err(ConfigError::invalid("finisher_combo must be at least 2"));
        }
        for kind in PowerUpKind::ALL {
            if self.power_up_durations.for_kind(kind) == 0 {
                return Err(ConfigError::invalid(format!(
                    "power-up duration for {kind:?} must be at least 1"
                )));
            }
        }
        for (name, weights) in [
            ("opening_weights", self.opponent.opening_weights),
            ("late_weights", self.opponent.late_weights),
        ] {
            if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
                return Err(ConfigError::invalid(format!(
                    "opponent {name} must be non-negative"
                )));
            }
            if weights.iter().sum::<f64>() <= 0.0 {
                return Err(ConfigError::invalid(format!(
                    "opponent {name} must have a positive sum"
                )));
            }
        }
        if self.journal_capacity == 0 {
            return Err(ConfigError::invalid("journal_capacity must be positive"));
        }
        Ok(())
    }
}
