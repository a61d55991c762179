//! Melody selection — one combatant's input for one turn.

use serde::{Deserialize, Serialize};

use super::Tone;

/// Highest harmony tier (a perfect harmony).
pub const MAX_TIER: u8 = 3;

/// A chosen pitch plus the quality tier the tuning bar (or policy) produced.
///
/// Created fresh each turn and consumed by the effect resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MelodySelection {
    pub pitch: Tone,
    /// Quality tier, 0 (miss) through 3 (perfect).
    pub tier: u8,
}

impl MelodySelection {
    /// Create a selection. Returns `None` if `tier` exceeds [`MAX_TIER`].
    pub fn new(pitch: Tone, tier: u8) -> Option<Self> {
        (tier <= MAX_TIER).then_some(Self { pitch, tier })
    }

    /// Whether this is a perfect-tier selection.
    pub fn is_perfect(&self) -> bool {
        self.tier == MAX_TIER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_tier() {
        assert!(MelodySelection::new(Tone::Alto, 3).is_some());
        assert!(MelodySelection::new(Tone::Alto, 4).is_none());
    }

    #[test]
    fn perfect_flag() {
        assert!(MelodySelection::new(Tone::Grave, 3).unwrap().is_perfect());
        assert!(!MelodySelection::new(Tone::Grave, 2).unwrap().is_perfect());
    }
}
