//! Tones — the eight environmental pitches a melody is matched against.
//!
//! Tones are ordered low → high. Each carries a reference frequency that only
//! the audio layer uses; the rules engine works with ranks.

pub mod environment;
pub mod selection;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use environment::EnvironmentState;
pub use selection::MelodySelection;

/// Number of distinct tones.
pub const TONE_COUNT: usize = 8;

/// An environmental tone, ordered low → high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tone {
    Grave,
    Deep,
    Medio,
    Alto,
    Bright,
    Soprano,
    Ethereal,
    Celestial,
}

impl Tone {
    /// All tones in rank order.
    pub const ALL: [Tone; TONE_COUNT] = [
        Tone::Grave,
        Tone::Deep,
        Tone::Medio,
        Tone::Alto,
        Tone::Bright,
        Tone::Soprano,
        Tone::Ethereal,
        Tone::Celestial,
    ];

    /// Rank of this tone (0 = lowest).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look up a tone by rank.
    pub fn from_index(idx: usize) -> Option<Tone> {
        Self::ALL.get(idx).copied()
    }

    /// Look up a tone by display label (case-insensitive).
    pub fn from_label(label: &str) -> Option<Tone> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.label().eq_ignore_ascii_case(label.trim()))
    }

    /// Map a normalized position in `[0, 1]` onto the tone scale.
    pub fn from_position(pos: f64) -> Tone {
        let idx = (pos.clamp(0.0, 1.0) * TONE_COUNT as f64) as usize;
        Self::ALL[idx.min(TONE_COUNT - 1)]
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Tone::Grave => "Grave",
            Tone::Deep => "Deep",
            Tone::Medio => "Medio",
            Tone::Alto => "Alto",
            Tone::Bright => "Bright",
            Tone::Soprano => "Soprano",
            Tone::Ethereal => "Ethereal",
            Tone::Celestial => "Celestial",
        }
    }

    /// Reference frequency in Hz for the audio layer.
    pub fn frequency(self) -> f64 {
        match self {
            Tone::Grave => 130.81,
            Tone::Deep => 164.81,
            Tone::Medio => 196.00,
            Tone::Alto => 261.63,
            Tone::Bright => 329.63,
            Tone::Soprano => 392.00,
            Tone::Ethereal => 523.25,
            Tone::Celestial => 659.25,
        }
    }

    /// Whether this tone sits in the top `n` ranks.
    pub fn in_top(self, n: usize) -> bool {
        self.index() + n >= TONE_COUNT
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
