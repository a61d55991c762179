//! Effect resolver — turns one selection into damage, heal, stun, combo,
//! score, and power-up changes.
//!
//! The order of operations is fixed:
//! 1. cooldown tick, then tier from the selection
//! 2. Musical Echo pitch substitution (+1 tier if it resonates)
//! 3. Bird Flock (+1 tier) and weather (`floor(modifier / 20)` tiers), clamp, perfect gate
//! 4. harmony = `tier * 30 + 10`
//! 5. base damage = `harmony / 10` (nothing on a tier-0 miss)
//! 6. combo
//! 7. finisher
//! 8. Wind Gust
//! 9. harmony table (perfect / brilliant / strong) and the ≥80 stun roll
//! 10. apply damage and heal
//! 11. player score
//! 12. successful pitch + power-up roll
//! 13. power-up timers for both sides
//! 14. last harmony, win check
//!
//! Dice draws, in order: stun roll (harmony ≥ 80), power-up roll
//! (harmony ≥ power-up threshold), power-up kind (only if the roll hit).

use crate::config::BattleConfig;
use crate::dice::RandomSource;
use crate::tone::selection::MAX_TIER;
use crate::tone::{EnvironmentState, MelodySelection};
use crate::tuning::PerfectQuota;
use crate::weather::{PowerUpKind, Weather};

use super::outcome::TurnOutcome;
use super::state::{MatchResult, MatchState, Side};

/// Harmony at which the ≥80 band (bonus damage + stun roll) starts.
pub const STRONG_HARMONY: u32 = 80;
/// Harmony at which the brilliant band starts.
pub const BRILLIANT_HARMONY: u32 = 90;
/// A perfect harmony.
pub const PERFECT_HARMONY: u32 = 100;
/// Turns a stun lasts.
pub const STUN_TURNS: u32 = 1;
const PERFECT_SCORE_BONUS: u32 = 100;

/// Canonical harmony percentage for a tier: 0, 1, 2, 3 ⇒ 10, 40, 70, 100.
pub fn tier_to_harmony(tier: u8) -> u32 {
    tier.min(MAX_TIER) as u32 * 30 + 10
}

fn scale(damage: u32, multiplier: f64) -> u32 {
    (damage as f64 * multiplier).floor() as u32
}

/// Damage and heal after the harmony table:
/// 100 ⇒ perfect multiplier + heal, ≥90 ⇒ brilliant multiplier + heal,
/// ≥80 ⇒ flat bonus, anything lower passes through.
pub fn apply_harmony_table(damage: u32, harmony: u32, config: &BattleConfig) -> (u32, u32) {
    if harmony >= PERFECT_HARMONY {
        (scale(damage, config.perfect_multiplier), config.perfect_heal)
    } else if harmony >= BRILLIANT_HARMONY {
        (scale(damage, config.brilliant_multiplier), config.brilliant_heal)
    } else if harmony >= STRONG_HARMONY {
        (damage + config.strong_bonus, 0)
    } else {
        (damage, 0)
    }
}

/// Resolve one turn for `side` and mutate `state` accordingly.
///
/// The caller guarantees the match is in play and `side` is not stunned.
/// When the opponent's health reaches zero, `state.phase` is set to the
/// terminal phase and the outcome carries the result.
pub fn resolve_turn(
    state: &mut MatchState,
    side: Side,
    selection: MelodySelection,
    env: &EnvironmentState,
    config: &BattleConfig,
    dice: &mut dyn RandomSource,
) -> TurnOutcome {
    state.perfect_harmony_cooldown = state.perfect_harmony_cooldown.saturating_sub(1);

    let mut tier = selection.tier.min(MAX_TIER) as i32;
    let mut pitch = selection.pitch;
    let mut echoed = false;

    let opponent_pitch = state.combatant(side.opponent()).last_successful_pitch;
    let actor_slot = state.combatant(side).power_up;
    if actor_slot.is(PowerUpKind::MusicalEcho) {
        if let Some(echo) = opponent_pitch {
            pitch = echo;
            echoed = true;
            if env.resonates_with(echo) {
                tier += 1;
            }
        }
    }
    if actor_slot.is(PowerUpKind::BirdFlock) {
        tier += 1;
    }
    tier += Weather::from_environment(env).tier_shift();
    let mut tier = tier.clamp(0, MAX_TIER as i32) as u8;

    let mut perfect_blocked = false;
    if tier == MAX_TIER {
        let quota = PerfectQuota {
            used: state.perfect_harmonies_used,
            max: config.max_perfect_harmonies,
            cooldown: state.perfect_harmony_cooldown,
        };
        if quota.allows() {
            state.perfect_harmonies_used += 1;
            state.perfect_harmony_cooldown = config.perfect_cooldown_turns;
        } else {
            tier = quota.gate(tier);
            perfect_blocked = true;
        }
    }

    let harmony = tier_to_harmony(tier);
    // A tier-0 click missed every zone and lands no blow.
    let mut damage = if tier == 0 { 0 } else { harmony / 10 };

    let threshold = config.success_threshold;
    if harmony >= threshold && state.last_harmony >= threshold {
        state.combo += 1;
        if state.combo > 1 {
            damage += state.combo;
        }
    } else {
        state.combo = 0;
    }

    let mut finisher = false;
    if state.combo >= config.finisher_combo {
        let multiplier = if harmony >= STRONG_HARMONY {
            config.finisher_strong_multiplier
        } else {
            config.finisher_multiplier
        };
        damage = scale(damage, multiplier) + config.finisher_flat_bonus;
        state.combo = 0;
        finisher = true;
    }

    if actor_slot.is(PowerUpKind::WindGust) {
        damage = scale(damage, config.wind_gust_multiplier);
    }

    let critical = harmony >= PERFECT_HARMONY;
    let (damage, heal) = apply_harmony_table(damage, harmony, config);
    let stun_applied = harmony >= STRONG_HARMONY && dice.chance(config.stun_chance);

    let max_health = config.max_health;
    {
        let (actor, target) = state.actor_and_target(side);
        target.take_damage(damage);
        if stun_applied {
            target.stun(STUN_TURNS);
        }
        actor.heal(heal, max_health);
    }

    let score_delta = match side {
        Side::Player => {
            let bonus = if critical { PERFECT_SCORE_BONUS } else { 0 };
            damage * 10 + state.combo * 5 + bonus
        }
        Side::Ai => 0,
    };
    state.score = state.score.saturating_add(score_delta);

    let mut power_up_granted = None;
    if harmony >= config.power_up_threshold {
        state.combatant_mut(side).last_successful_pitch = Some(pitch);
        if dice.chance(config.power_up_chance) {
            let kind = PowerUpKind::ALL[dice.pick(PowerUpKind::ALL.len())];
            let turns = config.power_up_durations.for_kind(kind);
            state.combatant_mut(side).power_up.grant(kind, turns);
            tracing::debug!(%side, kind = kind.label(), turns, "power-up granted");
            power_up_granted = Some(kind);
        }
    }

    state.player.power_up.tick();
    state.ai.power_up.tick();

    state.last_harmony = harmony;
    let terminal = if state.combatant(side.opponent()).is_down() {
        let result = MatchResult::won_by(side);
        state.phase = result.phase();
        Some(result)
    } else {
        None
    };

    tracing::debug!(
        %side,
        tier,
        harmony,
        damage,
        heal,
        combo = state.combo,
        stun = stun_applied,
        "turn resolved"
    );

    TurnOutcome {
        side,
        selection,
        pitch,
        harmony_tier: tier,
        harmony,
        damage_dealt: damage,
        heal_applied: heal,
        stun_applied,
        combo_after: state.combo,
        score_delta,
        finisher,
        critical,
        perfect_blocked,
        echoed,
        power_up_granted,
        terminal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::state::Phase;
    use crate::dice::ScriptedDice;
    use crate::tone::Tone;

    /// Calm weather: wind and birds both low.
    fn calm() -> EnvironmentState {
        EnvironmentState::new(Tone::Grave, Tone::Alto)
    }

    fn in_play() -> MatchState {
        let mut s = MatchState::new(100);
        s.phase = Phase::PlayerTurn;
        s
    }

    fn sel(tier: u8) -> MelodySelection {
        MelodySelection {
            pitch: Tone::Medio,
            tier,
        }
    }

    /// Dice that never hit a chance roll.
    fn cold() -> ScriptedDice {
        ScriptedDice::new(Vec::new())
    }

    #[test]
    fn tier_harmony_table() {
        assert_eq!(tier_to_harmony(0), 10);
        assert_eq!(tier_to_harmony(1), 40);
        assert_eq!(tier_to_harmony(2), 70);
        assert_eq!(tier_to_harmony(3), 100);
        assert_eq!(tier_to_harmony(9), 100);
    }

    #[test]
    fn clean_miss() {
        let mut s = in_play();
        s.combo = 3;
        s.last_harmony = 70;
        let out = resolve_turn(&mut s, Side::Player, sel(0), &calm(), &BattleConfig::default(), &mut cold());
        assert_eq!(out.harmony, 10);
        assert_eq!(out.damage_dealt, 0);
        assert_eq!(s.ai.health, 100);
        assert_eq!(s.combo, 0);
        assert_eq!(out.power_up_granted, None);
        assert_eq!(s.player.last_successful_pitch, None);
    }

    #[test]
    fn perfect_hit_within_quota() {
        let mut s = in_play();
        let out = resolve_turn(&mut s, Side::Player, sel(3), &calm(), &BattleConfig::default(), &mut cold());
        assert_eq!(out.harmony, 100);
        assert!(out.critical);
        assert_eq!(out.damage_dealt, 17);
        assert_eq!(out.heal_applied, 5);
        assert_eq!(s.ai.health, 83);
        assert_eq!(s.perfect_harmonies_used, 1);
        assert_eq!(s.perfect_harmony_cooldown, 3);
        assert_eq!(out.score_delta, 170 + 100);
    }

    #[test]
    fn quota_exhausted_caps_at_tier_two() {
        let mut s = in_play();
        s.perfect_harmonies_used = 3;
        let out = resolve_turn(&mut s, Side::Player, sel(3), &calm(), &BattleConfig::default(), &mut cold());
        assert_eq!(out.harmony_tier, 2);
        assert_eq!(out.harmony, 70);
        assert!(out.perfect_blocked);
        assert_eq!(out.heal_applied, 0);
        assert_eq!(s.perfect_harmonies_used, 3);
    }

    #[test]
    fn cooldown_blocks_then_expires() {
        let config = BattleConfig::default();
        let mut s = in_play();
        resolve_turn(&mut s, Side::Player, sel(3), &calm(), &config, &mut cold());
        assert_eq!(s.perfect_harmony_cooldown, 3);
        // Two more resolutions still see a cooldown.
        let out = resolve_turn(&mut s, Side::Ai, sel(3), &calm(), &config, &mut cold());
        assert!(out.perfect_blocked);
        let out = resolve_turn(&mut s, Side::Player, sel(3), &calm(), &config, &mut cold());
        assert!(out.perfect_blocked);
        // The third resolution ticks the cooldown to zero first.
        let out = resolve_turn(&mut s, Side::Ai, sel(3), &calm(), &config, &mut cold());
        assert!(out.critical);
        assert_eq!(s.perfect_harmonies_used, 2);
    }

    #[test]
    fn combo_builds_and_adds_damage() {
        let config = BattleConfig::default();
        let mut s = in_play();
        let first = resolve_turn(&mut s, Side::Player, sel(2), &calm(), &config, &mut cold());
        assert_eq!(first.combo_after, 0);
        assert_eq!(first.damage_dealt, 7);
        let second = resolve_turn(&mut s, Side::Ai, sel(2), &calm(), &config, &mut cold());
        assert_eq!(second.combo_after, 1);
        assert_eq!(second.damage_dealt, 7);
        let third = resolve_turn(&mut s, Side::Player, sel(2), &calm(), &config, &mut cold());
        assert_eq!(third.combo_after, 2);
        assert_eq!(third.damage_dealt, 9);
    }

    #[test]
    fn combo_resets_below_threshold() {
        let mut s = in_play();
        s.combo = 3;
        s.last_harmony = 70;
        let out = resolve_turn(&mut s, Side::Player, sel(1), &calm(), &BattleConfig::default(), &mut cold());
        assert_eq!(out.combo_after, 0);
    }

    #[test]
    fn finisher_fires_and_resets_combo() {
        let mut s = in_play();
        s.combo = 3;
        s.last_harmony = 70;
        let out = resolve_turn(&mut s, Side::Player, sel(2), &calm(), &BattleConfig::default(), &mut cold());
        // base 7 + combo 4 = 11, ×1.5 = 16, +4 = 20
        assert!(out.finisher);
        assert_eq!(out.damage_dealt, 20);
        assert_eq!(out.combo_after, 0);
        assert_eq!(out.score_delta, 200);
    }

    #[test]
    fn wind_gust_multiplies() {
        let mut s = in_play();
        s.player.power_up.grant(PowerUpKind::WindGust, 2);
        let out = resolve_turn(&mut s, Side::Player, sel(2), &calm(), &BattleConfig::default(), &mut cold());
        assert_eq!(out.damage_dealt, 10);
        assert_eq!(s.player.power_up.turns_remaining(), 1);
    }

    #[test]
    fn bird_flock_raises_tier() {
        let mut s = in_play();
        s.player.power_up.grant(PowerUpKind::BirdFlock, 3);
        let out = resolve_turn(&mut s, Side::Player, sel(1), &calm(), &BattleConfig::default(), &mut cold());
        assert_eq!(out.harmony_tier, 2);
        assert_eq!(out.harmony, 70);
    }

    #[test]
    fn gale_lowers_tier() {
        let gale = EnvironmentState::new(Tone::Celestial, Tone::Grave);
        let mut s = in_play();
        let out = resolve_turn(&mut s, Side::Player, sel(2), &gale, &BattleConfig::default(), &mut cold());
        assert_eq!(out.harmony_tier, 1);
        let out = resolve_turn(&mut s, Side::Player, sel(0), &gale, &BattleConfig::default(), &mut cold());
        assert_eq!(out.harmony_tier, 0);
    }

    #[test]
    fn echo_copies_opponent_pitch_and_resonates() {
        let mut s = in_play();
        s.ai.last_successful_pitch = Some(Tone::Alto);
        s.player.power_up.grant(PowerUpKind::MusicalEcho, 1);
        let out = resolve_turn(&mut s, Side::Player, sel(1), &calm(), &BattleConfig::default(), &mut cold());
        assert!(out.echoed);
        assert_eq!(out.pitch, Tone::Alto);
        assert_eq!(out.harmony_tier, 2);
        assert_eq!(s.player.last_successful_pitch, Some(Tone::Alto));
        assert_eq!(s.player.power_up.active(), None);
    }

    #[test]
    fn echo_without_opponent_pitch_is_inert() {
        let mut s = in_play();
        s.player.power_up.grant(PowerUpKind::MusicalEcho, 1);
        let out = resolve_turn(&mut s, Side::Player, sel(1), &calm(), &BattleConfig::default(), &mut cold());
        assert!(!out.echoed);
        assert_eq!(out.pitch, Tone::Medio);
    }

    #[test]
    fn strong_hit_can_stun() {
        // Perfect hit by the AI with the stun roll forced.
        let mut s = in_play();
        let mut dice = ScriptedDice::new([0.1]);
        let out = resolve_turn(&mut s, Side::Ai, sel(3), &calm(), &BattleConfig::default(), &mut dice);
        assert!(out.stun_applied);
        assert!(s.player.stunned);
        assert_eq!(s.player.stun_turns_remaining, 1);
        assert_eq!(out.score_delta, 0);
        assert_eq!(s.score, 0);
    }

    #[test]
    fn failed_stun_roll() {
        let mut s = in_play();
        let mut dice = ScriptedDice::new([0.6]);
        let out = resolve_turn(&mut s, Side::Ai, sel(3), &calm(), &BattleConfig::default(), &mut dice);
        assert!(!out.stun_applied);
        assert!(!s.player.stunned);
    }

    #[test]
    fn harmony_table_bands() {
        let config = BattleConfig::default();
        assert_eq!(apply_harmony_table(10, 100, &config), (17, 5));
        assert_eq!(apply_harmony_table(9, 90, &config), (12, 2));
        assert_eq!(apply_harmony_table(8, 80, &config), (11, 0));
        assert_eq!(apply_harmony_table(7, 70, &config), (7, 0));
        assert_eq!(apply_harmony_table(0, 10, &config), (0, 0));
    }

    #[test]
    fn tier_two_does_not_roll_stun() {
        let mut s = in_play();
        let mut dice = ScriptedDice::new([0.0, 0.999]);
        let out = resolve_turn(&mut s, Side::Player, sel(2), &calm(), &BattleConfig::default(), &mut dice);
        assert!(!out.stun_applied);
        // The 0.0 roll went to the power-up chance instead.
        assert!(out.power_up_granted.is_some());
    }

    #[test]
    fn power_up_roll_grants_and_ticks_same_turn() {
        let mut s = in_play();
        // power-up roll hits, kind index 1 = BirdFlock
        let mut dice = ScriptedDice::new([0.1, 0.4]);
        let out = resolve_turn(&mut s, Side::Player, sel(2), &calm(), &BattleConfig::default(), &mut dice);
        assert_eq!(out.power_up_granted, Some(PowerUpKind::BirdFlock));
        assert!(s.player.power_up.is(PowerUpKind::BirdFlock));
        assert_eq!(s.player.power_up.turns_remaining(), 2);
    }

    #[test]
    fn new_power_up_overwrites_old() {
        let mut s = in_play();
        s.player.power_up.grant(PowerUpKind::BirdFlock, 3);
        // BirdFlock lifts tier 2 to 3; stun miss, power-up hit, kind 0 = WindGust
        let mut dice = ScriptedDice::new([0.9, 0.1, 0.0]);
        let out = resolve_turn(&mut s, Side::Player, sel(2), &calm(), &BattleConfig::default(), &mut dice);
        assert_eq!(out.power_up_granted, Some(PowerUpKind::WindGust));
        assert!(s.player.power_up.is(PowerUpKind::WindGust));
        assert_eq!(s.player.power_up.turns_remaining(), 1);
    }

    #[test]
    fn lethal_overflow_clamps() {
        let mut s = in_play();
        s.ai.health = 5;
        let out = resolve_turn(&mut s, Side::Player, sel(3), &calm(), &BattleConfig::default(), &mut cold());
        assert_eq!(out.damage_dealt, 17);
        assert_eq!(s.ai.health, 0);
        assert_eq!(out.terminal, Some(MatchResult::Victory));
        assert_eq!(s.phase, Phase::Victory);
    }

    #[test]
    fn ai_knockout_is_defeat() {
        let mut s = in_play();
        s.player.health = 1;
        let out = resolve_turn(&mut s, Side::Ai, sel(1), &calm(), &BattleConfig::default(), &mut cold());
        assert_eq!(out.terminal, Some(MatchResult::Defeat));
        assert_eq!(s.phase, Phase::Defeat);
    }

    #[test]
    fn heal_never_exceeds_max() {
        let mut s = in_play();
        s.player.health = 97;
        resolve_turn(&mut s, Side::Player, sel(3), &calm(), &BattleConfig::default(), &mut cold());
        assert_eq!(s.player.health, 100);
    }
}
