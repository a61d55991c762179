//! Match and combatant state. Owned by [`MatchContext`](super::MatchContext);
//! the presentation layer only ever sees shared references.

use std::fmt;

use crate::tone::Tone;
use crate::weather::PowerUpSlot;

/// One of the two combatants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Player,
    Ai,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Ai,
            Side::Ai => Side::Player,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => f.write_str("player"),
            Side::Ai => f.write_str("ai"),
        }
    }
}

/// Where the match is. Menu → Tutorial → PlayerTurn ⇄ AiTurn → Victory | Defeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Menu,
    Tutorial,
    PlayerTurn,
    AiTurn,
    Victory,
    Defeat,
}

impl Phase {
    /// Victory or Defeat.
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Victory | Phase::Defeat)
    }

    /// PlayerTurn or AiTurn.
    pub fn in_play(self) -> bool {
        matches!(self, Phase::PlayerTurn | Phase::AiTurn)
    }
}

/// How a finished match ended, from the player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    Victory,
    Defeat,
}

impl MatchResult {
    /// The result when `winner` knocks out the other side.
    pub fn won_by(winner: Side) -> Self {
        match winner {
            Side::Player => MatchResult::Victory,
            Side::Ai => MatchResult::Defeat,
        }
    }

    pub fn phase(self) -> Phase {
        match self {
            MatchResult::Victory => Phase::Victory,
            MatchResult::Defeat => Phase::Defeat,
        }
    }
}

/// Per-side state for one match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatantState {
    pub health: u32,
    pub stunned: bool,
    pub stun_turns_remaining: u32,
    pub power_up: PowerUpSlot,
    pub last_successful_pitch: Option<Tone>,
}

impl CombatantState {
    /// A fresh combatant at full health.
    pub fn new(max_health: u32) -> Self {
        Self {
            health: max_health,
            stunned: false,
            stun_turns_remaining: 0,
            power_up: PowerUpSlot::default(),
            last_successful_pitch: None,
        }
    }

    /// Subtract damage, flooring at zero.
    pub fn take_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    /// Add health, capped at `max_health`.
    pub fn heal(&mut self, amount: u32, max_health: u32) {
        self.health = self.health.saturating_add(amount).min(max_health);
    }

    /// Stun for at least `turns` turns.
    pub fn stun(&mut self, turns: u32) {
        if turns == 0 {
            return;
        }
        self.stunned = true;
        self.stun_turns_remaining = self.stun_turns_remaining.max(turns);
    }

    /// Spend one stunned turn. Returns `true` if the turn must be skipped.
    pub fn consume_stun(&mut self) -> bool {
        if !self.stunned {
            return false;
        }
        self.stun_turns_remaining = self.stun_turns_remaining.saturating_sub(1);
        if self.stun_turns_remaining == 0 {
            self.stunned = false;
        }
        true
    }

    pub fn is_down(&self) -> bool {
        self.health == 0
    }
}

/// Everything that drives the turn state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchState {
    pub turn_number: u32,
    pub active_side: Side,
    pub combo: u32,
    /// Harmony of the most recent resolved turn, either side.
    pub last_harmony: u32,
    /// Player-only score.
    pub score: u32,
    pub perfect_harmony_cooldown: u32,
    pub perfect_harmonies_used: u32,
    pub phase: Phase,
    pub player: CombatantState,
    pub ai: CombatantState,
    /// Player turns in a row that scored tier 1 or lower.
    pub consecutive_misses: u32,
    /// Widen the next tuning-bar layout.
    pub mercy_pending: bool,
}

impl MatchState {
    /// State for the main menu, before any match has begun.
    pub fn new(max_health: u32) -> Self {
        Self {
            turn_number: 1,
            active_side: Side::Player,
            combo: 0,
            last_harmony: 0,
            score: 0,
            perfect_harmony_cooldown: 0,
            perfect_harmonies_used: 0,
            phase: Phase::Menu,
            player: CombatantState::new(max_health),
            ai: CombatantState::new(max_health),
            consecutive_misses: 0,
            mercy_pending: false,
        }
    }

    pub fn combatant(&self, side: Side) -> &CombatantState {
        match side {
            Side::Player => &self.player,
            Side::Ai => &self.ai,
        }
    }

    pub fn combatant_mut(&mut self, side: Side) -> &mut CombatantState {
        match side {
            Side::Player => &mut self.player,
            Side::Ai => &mut self.ai,
        }
    }

    /// Mutable access to the acting side and its opponent at once.
    pub fn actor_and_target(&mut self, side: Side) -> (&mut CombatantState, &mut CombatantState) {
        match side {
            Side::Player => (&mut self.player, &mut self.ai),
            Side::Ai => (&mut self.ai, &mut self.player),
        }
    }

    /// Track consecutive player misses; two in a row queue a mercy turn.
    pub(crate) fn record_player_tier(&mut self, tier: u8) {
        if tier <= 1 {
            self.consecutive_misses += 1;
            if self.consecutive_misses >= 2 {
                self.mercy_pending = true;
                self.consecutive_misses = 0;
            }
        } else {
            self.consecutive_misses = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_floors_at_zero() {
        let mut c = CombatantState::new(100);
        c.health = 5;
        c.take_damage(17);
        assert_eq!(c.health, 0);
        assert!(c.is_down());
    }

    #[test]
    fn heal_caps_at_max() {
        let mut c = CombatantState::new(100);
        c.health = 98;
        c.heal(5, 100);
        assert_eq!(c.health, 100);
    }

    #[test]
    fn stun_is_consumed_once() {
        let mut c = CombatantState::new(100);
        c.stun(1);
        assert!(c.stunned);
        assert_eq!(c.stun_turns_remaining, 1);
        assert!(c.consume_stun());
        assert!(!c.stunned);
        assert_eq!(c.stun_turns_remaining, 0);
        assert!(!c.consume_stun());
    }

    #[test]
    fn restun_does_not_shorten() {
        let mut c = CombatantState::new(100);
        c.stun(2);
        c.stun(1);
        assert_eq!(c.stun_turns_remaining, 2);
    }

    #[test]
    fn sides_alternate() {
        assert_eq!(Side::Player.opponent(), Side::Ai);
        assert_eq!(Side::Ai.opponent(), Side::Player);
    }

    #[test]
    fn phase_classification() {
        assert!(Phase::Victory.is_terminal());
        assert!(Phase::Defeat.is_terminal());
        assert!(!Phase::AiTurn.is_terminal());
        assert!(Phase::PlayerTurn.in_play());
        assert!(!Phase::Menu.in_play());
        assert_eq!(MatchResult::won_by(Side::Ai).phase(), Phase::Defeat);
    }

    #[test]
    fn two_misses_queue_mercy() {
        let mut s = MatchState::new(100);
        s.record_player_tier(1);
        assert!(!s.mercy_pending);
        s.record_player_tier(0);
        assert!(s.mercy_pending);
        assert_eq!(s.consecutive_misses, 0);
    }

    #[test]
    fn a_hit_breaks_the_miss_streak() {
        let mut s = MatchState::new(100);
        s.record_player_tier(1);
        s.record_player_tier(2);
        s.record_player_tier(1);
        assert!(!s.mercy_pending);
        assert_eq!(s.consecutive_misses, 1);
    }
}
