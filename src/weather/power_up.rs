//! Power-ups — turn-limited boons granted on strong harmonies.

use serde::{Deserialize, Serialize};

/// A power-up a combatant can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Damage ×1.5.
    WindGust,
    /// +1 quality tier.
    BirdFlock,
    /// Replay the opponent's last successful pitch.
    MusicalEcho,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::WindGust,
        PowerUpKind::BirdFlock,
        PowerUpKind::MusicalEcho,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PowerUpKind::WindGust => "Wind Gust",
            PowerUpKind::BirdFlock => "Bird Flock",
            PowerUpKind::MusicalEcho => "Musical Echo",
        }
    }
}

/// One combatant's power-up slot. Holds at most one power-up; a new grant
/// overwrites the old one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PowerUpSlot {
    active: Option<PowerUpKind>,
    turns_remaining: u32,
}

impl PowerUpSlot {
    /// Install a power-up for `turns` turns, replacing whatever was held.
    pub fn grant(&mut self, kind: PowerUpKind, turns: u32) {
        if turns == 0 {
            self.clear();
            return;
        }
        self.active = Some(kind);
        self.turns_remaining = turns;
    }

    /// Count down one turn. Clears the slot when it reaches zero.
    pub fn tick(&mut self) {
        if self.active.is_none() {
            return;
        }
        self.turns_remaining = self.turns_remaining.saturating_sub(1);
        if self.turns_remaining == 0 {
            self.active = None;
        }
    }

    pub fn clear(&mut self) {
        self.active = None;
        self.turns_remaining = 0;
    }

    /// The held power-up, if any.
    pub fn active(&self) -> Option<PowerUpKind> {
        self.active
    }

    pub fn turns_remaining(&self) -> u32 {
        self.turns_remaining
    }

    /// Whether `kind` is currently held.
    pub fn is(&self, kind: PowerUpKind) -> bool {
        self.active == Some(kind)
    }
}
