//! Weather — harmony modifiers derived from the environment, and power-ups.
//!
//! Rule table (ranks counted from the top of the tone scale):
//! - wind in the top two ranks: gale, −20
//! - wind in the next two ranks: breeze, −10
//! - birds in the top two ranks: dawn chorus, +15 (stacks with wind)

pub mod power_up;

use std::fmt;

pub use power_up::{PowerUpKind, PowerUpSlot};

use crate::tone::EnvironmentState;

/// Harmony points one tier is worth when applying the modifier to a tier.
pub const POINTS_PER_TIER: i32 = 20;

/// How hard the wind is blowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindLevel {
    Calm,
    Breeze,
    Gale,
}

/// The current weather, derived from the environment tones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weather {
    pub wind: WindLevel,
    /// Birds singing in the top two ranks.
    pub chorus: bool,
}

impl Weather {
    /// Classify an environment.
    pub fn from_environment(env: &EnvironmentState) -> Self {
        let wind = if env.wind.in_top(2) {
            WindLevel::Gale
        } else if env.wind.in_top(4) {
            WindLevel::Breeze
        } else {
            WindLevel::Calm
        };
        Self {
            wind,
            chorus: env.birds.in_top(2),
        }
    }

    /// Signed harmony modifier in points.
    pub fn modifier(&self) -> i32 {
        let wind = match self.wind {
            WindLevel::Calm => 0,
            WindLevel::Breeze => -10,
            WindLevel::Gale => -20,
        };
        let birds = if self.chorus { 15 } else { 0 };
        wind + birds
    }

    /// The modifier expressed in whole tiers, floored toward −∞.
    pub fn tier_shift(&self) -> i32 {
        self.modifier().div_euclid(POINTS_PER_TIER)
    }

    /// Net helpful weather: steadies the tuning bar.
    pub fn is_favorable(&self) -> bool {
        self.modifier() > 0
    }

    /// Net hostile weather: shakes the tuning bar.
    pub fn is_harsh(&self) -> bool {
        self.modifier() < 0
    }

    /// Display label for the HUD.
    pub fn label(&self) -> String {
        let sky = match self.wind {
            WindLevel::Calm => "Clear skies",
            WindLevel::Breeze => "Breezy",
            WindLevel::Gale => "Gale",
        };
        if self.chorus {
            format!("{sky} with dawn chorus")
        } else {
            sky.to_string()
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Harmony modifier for an environment, in points.
pub fn weather_modifier(env: &EnvironmentState) -> i32 {
    Weather::from_environment(env).modifier()
}

/// Display label for an environment's weather.
pub fn current_weather_label(env: &EnvironmentState) -> String {
    Weather::from_environment(env).label()
}
