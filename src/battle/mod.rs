//! Battle engine — the turn state machine and the single owner of match state.
//!
//! [`MatchContext`] holds the config, dice, environment, match/combatant
//! state, tuning bar, opponent policy, timers, and journal. The presentation
//! layer reads through shared accessors and mutates only through the entry
//! points below; there is no ambient global state.
//!
//! Per turn: stun check → selection (tuning bar, timeout, or opponent
//! policy) → [`resolver::resolve_turn`] → win check → environment refresh →
//! turn flips.

pub mod outcome;
pub mod resolver;
pub mod state;
pub mod timer;

pub use outcome::{JournalEntry, OutcomeJournal, TurnOutcome};
pub use state::{CombatantState, MatchResult, MatchState, Phase, Side};
pub use timer::TurnTimer;

use tracing::{debug, info};

use crate::config::BattleConfig;
use crate::dice::{RandomSource, SeededDice};
use crate::opponent::OpponentPolicy;
use crate::tone::selection::MAX_TIER;
use crate::tone::{EnvironmentState, MelodySelection};
use crate::tuning::{self, ArmContext, PerfectQuota, TuningBar};
use crate::weather::Weather;

/// Result of advancing the clock by one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimerTick {
    /// The player's turn timer ran out on this tick.
    pub expired: bool,
    /// A turn resolved on this tick (timeout auto-resolve or the opponent's move).
    pub outcome: Option<TurnOutcome>,
}

/// One match, start to finish, and every rematch after it.
pub struct MatchContext<D: RandomSource = SeededDice> {
    config: BattleConfig,
    dice: D,
    state: MatchState,
    environment: EnvironmentState,
    tuning: TuningBar,
    policy: OpponentPolicy,
    turn_timer: TurnTimer,
    ai_delay: TurnTimer,
    journal: OutcomeJournal,
}

impl MatchContext<SeededDice> {
    /// A context with seeded dice.
    pub fn seeded(config: BattleConfig, seed: u64) -> Self {
        Self::new(config, SeededDice::new(seed))
    }
}

impl<D: RandomSource> MatchContext<D> {
    /// Create a context sitting on the main menu.
    pub fn new(config: BattleConfig, dice: D) -> Self {
        Self {
            state: MatchState::new(config.max_health),
            environment: EnvironmentState::default(),
            tuning: TuningBar::new(),
            policy: OpponentPolicy::new(config.opponent),
            turn_timer: TurnTimer::new(config.turn_timer_ms),
            ai_delay: TurnTimer::new(config.ai_delay_ms),
            journal: OutcomeJournal::new(config.journal_capacity),
            config,
            dice,
        }
    }

    // --- read accessors ---

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn environment(&self) -> &EnvironmentState {
        &self.environment
    }

    pub fn weather(&self) -> Weather {
        Weather::from_environment(&self.environment)
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn tuning_bar(&self) -> &TuningBar {
        &self.tuning
    }

    pub fn journal(&self) -> &OutcomeJournal {
        &self.journal
    }

    /// Milliseconds left on the player's turn timer.
    pub fn turn_time_remaining_ms(&self) -> u64 {
        self.turn_timer.remaining_ms()
    }

    /// The perfect-harmony quota as it stands.
    pub fn perfect_quota(&self) -> PerfectQuota {
        PerfectQuota {
            used: self.state.perfect_harmonies_used,
            max: self.config.max_perfect_harmonies,
            cooldown: self.state.perfect_harmony_cooldown,
        }
    }

    /// Mutable access to the dice, e.g. to queue scripted rolls.
    pub fn dice_mut(&mut self) -> &mut D {
        &mut self.dice
    }

    // --- phase transitions ---

    /// The start signal: Menu → Tutorial → PlayerTurn. Ignored elsewhere.
    pub fn start(&mut self) -> Phase {
        match self.state.phase {
            Phase::Menu => {
                self.state.phase = Phase::Tutorial;
                info!("entering tutorial");
            }
            Phase::Tutorial => self.begin_match(),
            _ => {}
        }
        self.state.phase
    }

    /// Start over from a finished (or running) match. Returns `false` from
    /// the menu or tutorial, which must go through [`start`](Self::start).
    pub fn reset_match(&mut self) -> bool {
        if matches!(self.state.phase, Phase::Menu | Phase::Tutorial) {
            return false;
        }
        self.begin_match();
        true
    }

    fn begin_match(&mut self) {
        self.state = MatchState::new(self.config.max_health);
        self.state.phase = Phase::PlayerTurn;
        self.environment = EnvironmentState::regenerate(&mut self.dice);
        self.tuning.disarm();
        self.turn_timer.reset();
        self.ai_delay.reset();
        self.journal.clear();
        info!(
            wind = %self.environment.wind,
            birds = %self.environment.birds,
            "match started"
        );
    }

    // --- tuning bar ---

    /// Arm the tuning bar for the player's turn. Consumes a pending mercy
    /// widening. Returns `false` outside the player's turn.
    pub fn arm_tuning_bar(&mut self) -> bool {
        if self.state.phase != Phase::PlayerTurn || self.state.player.stunned {
            return false;
        }
        let ctx = ArmContext {
            turn_number: self.state.turn_number,
            combo: self.state.combo,
            weather: self.weather(),
            mercy: self.state.mercy_pending,
        };
        self.state.mercy_pending = false;
        self.tuning.arm(&ctx, &mut self.dice);
        true
    }

    /// Advance the armed marker by `delta_ms`.
    pub fn update_tuning_bar(&mut self, delta_ms: f64) {
        if self.state.phase == Phase::PlayerTurn {
            self.tuning.update(delta_ms, &mut self.dice);
        }
    }

    /// Click: score the marker. The result still has to be submitted.
    pub fn resolve_tuning_bar(&mut self) -> Option<MelodySelection> {
        if self.state.phase != Phase::PlayerTurn {
            return None;
        }
        // Gate against the cooldown the resolver will see after its own tick.
        let mut quota = self.perfect_quota();
        quota.cooldown = quota.cooldown.saturating_sub(1);
        self.tuning.resolve(&quota).map(|r| r.selection)
    }

    // --- turns ---

    /// Play the player's selection. Returns `None` (and changes nothing)
    /// outside the player's turn, while stunned, or for an invalid tier.
    pub fn submit_selection(&mut self, selection: MelodySelection) -> Option<TurnOutcome> {
        if self.state.phase != Phase::PlayerTurn
            || self.state.player.stunned
            || selection.tier > MAX_TIER
        {
            return None;
        }
        Some(self.play_turn(Side::Player, selection))
    }

    /// Play the opponent's turn now, skipping the pacing delay.
    pub fn play_ai_turn(&mut self) -> Option<TurnOutcome> {
        if self.state.phase != Phase::AiTurn {
            return None;
        }
        let selection = self
            .policy
            .choose(&self.environment, self.state.turn_number, &mut self.dice);
        Some(self.play_turn(Side::Ai, selection))
    }

    /// Advance the clock. On the player's turn this moves the tuning bar and
    /// the turn timer, auto-resolving a tier-1 random pitch on expiry. On the
    /// opponent's turn it waits out the pacing delay, then plays the move.
    pub fn tick(&mut self, delta_ms: f64) -> TimerTick {
        match self.state.phase {
            Phase::PlayerTurn => {
                self.tuning.update(delta_ms, &mut self.dice);
                if !self.turn_timer.advance(delta_ms) {
                    return TimerTick::default();
                }
                debug!("turn timer expired");
                let selection = tuning::timeout_selection(&mut self.dice);
                TimerTick {
                    expired: true,
                    outcome: Some(self.play_turn(Side::Player, selection)),
                }
            }
            Phase::AiTurn => {
                if !self.ai_delay.advance(delta_ms) {
                    return TimerTick::default();
                }
                TimerTick {
                    expired: false,
                    outcome: self.play_ai_turn(),
                }
            }
            _ => TimerTick::default(),
        }
    }

    fn play_turn(&mut self, side: Side, selection: MelodySelection) -> TurnOutcome {
        let outcome = resolver::resolve_turn(
            &mut self.state,
            side,
            selection,
            &self.environment,
            &self.config,
            &mut self.dice,
        );
        if side == Side::Player {
            self.state.record_player_tier(outcome.harmony_tier);
            self.tuning.disarm();
        }
        self.journal.push(JournalEntry::Resolved(outcome.clone()));

        if let Some(result) = outcome.terminal {
            info!(
                ?result,
                turn = self.state.turn_number,
                score = self.state.score,
                "match over"
            );
            return outcome;
        }

        self.environment = EnvironmentState::regenerate(&mut self.dice);
        match side {
            Side::Player => self.enter_ai_turn(),
            Side::Ai => {
                self.state.turn_number += 1;
                self.enter_player_turn();
            }
        }
        outcome
    }

    fn enter_player_turn(&mut self) {
        self.state.phase = Phase::PlayerTurn;
        self.state.active_side = Side::Player;
        self.turn_timer.reset();
        if self.state.player.consume_stun() {
            self.record_skip(Side::Player);
            self.enter_ai_turn();
        }
    }

    fn enter_ai_turn(&mut self) {
        self.state.phase = Phase::AiTurn;
        self.state.active_side = Side::Ai;
        self.ai_delay.reset();
        if self.state.ai.consume_stun() {
            self.record_skip(Side::Ai);
            self.state.turn_number += 1;
            self.enter_player_turn();
        }
    }

    fn record_skip(&mut self, side: Side) {
        info!(%side, turn = self.state.turn_number, "stunned, turn skipped");
        self.journal.push(JournalEntry::StunSkipped {
            side,
            turn_number: self.state.turn_number,
        });
    }
}
