//! Tuning bar — turns one timed click into a harmony tier.
//!
//! Lifecycle per turn: `Idle → Armed → Resolved`. Arming picks a pattern,
//! a speed, a zone layout, and an optional turn event; every frame the
//! marker is advanced with [`TuningBar::update`]; a click calls
//! [`TuningBar::resolve`], which scores the marker (and the Echo ghost, if
//! present) against the zones.

pub mod pattern;
pub mod zone;

pub use pattern::Pattern;
pub use zone::{Topology, Zone, ZoneHit, ZoneLayout};

use crate::dice::RandomSource;
use crate::tone::selection::MAX_TIER;
use crate::tone::{MelodySelection, Tone, TONE_COUNT};
use crate::weather::Weather;

/// Chance that a turn carries a Storm or Echo event.
pub const TURN_EVENT_CHANCE: f64 = 0.25;
/// Track fraction between the marker and the Echo ghost.
pub const ECHO_GHOST_OFFSET: f64 = 0.35;
/// Zone widening applied once after two consecutive failed turns.
pub const MERCY_WIDEN: f64 = 1.5;

const BASE_SPEED: f64 = 0.45;
const SPEED_PER_TURN: f64 = 0.03;
const SPEED_PER_COMBO: f64 = 0.08;
const MAX_SPEED: f64 = 1.4;
const NARROW_PER_COMBO: f64 = 0.06;
const MIN_WIDTH_SCALE: f64 = 0.7;
const BASE_JITTER: f64 = 0.015;
const BASE_DRIFT_SPEED: f64 = 0.1;
const STORM_DRIFT_SPEED: f64 = 0.35;

/// Optional twist applied to a single turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnEvent {
    /// Heavier jitter and faster zone drift.
    Storm,
    /// A ghost marker trails the real one; the better of the two counts.
    Echo,
}

/// Where the bar is in its per-turn lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarState {
    Idle,
    Armed,
    Resolved,
}

/// Match facts the bar needs when arming.
#[derive(Debug, Clone, Copy)]
pub struct ArmContext {
    pub turn_number: u32,
    pub combo: u32,
    pub weather: Weather,
    /// Widen zones this turn (consumed by the caller).
    pub mercy: bool,
}

/// Read-only view of the perfect-harmony quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerfectQuota {
    pub used: u32,
    pub max: u32,
    pub cooldown: u32,
}

impl PerfectQuota {
    /// Whether a perfect harmony may be awarded right now.
    pub fn allows(&self) -> bool {
        self.used < self.max && self.cooldown == 0
    }

    /// Cap `tier` at 2 if a perfect harmony isn't available.
    pub fn gate(&self, tier: u8) -> u8 {
        if tier >= MAX_TIER && !self.allows() {
            MAX_TIER - 1
        } else {
            tier
        }
    }
}

/// What a click produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TuningResult {
    pub selection: MelodySelection,
    /// Tier before the quota gate.
    pub raw_tier: u8,
    /// Track position that scored (the ghost's, if it won).
    pub position: f64,
    pub ghost_won: bool,
}

impl TuningResult {
    /// Whether the quota gate lowered a perfect hit.
    pub fn downgraded(&self) -> bool {
        self.raw_tier > self.selection.tier
    }
}

/// The tuning-bar minigame for one turn.
#[derive(Debug, Clone)]
pub struct TuningBar {
    state: BarState,
    pattern: Pattern,
    speed: f64,
    layout: ZoneLayout,
    event: Option<TurnEvent>,
    jitter: f64,
    elapsed_ms: f64,
    position: f64,
}

impl TuningBar {
    /// An idle bar with no zones.
    pub fn new() -> Self {
        Self {
            state: BarState::Idle,
            pattern: Pattern::Sine,
            speed: BASE_SPEED,
            layout: ZoneLayout {
                topology: Topology::Concentric,
                zones: Vec::new(),
                drift_speed: 0.0,
                drift_amplitude: 0.0,
            },
            event: None,
            jitter: 0.0,
            elapsed_ms: 0.0,
            position: 0.5,
        }
    }

    /// Arm the bar for a new turn.
    ///
    /// Draw order: pattern, topology, layout rolls (see
    /// [`ZoneLayout::generate`]), event chance, then event kind if hit.
    pub fn arm(&mut self, ctx: &ArmContext, dice: &mut dyn RandomSource) {
        let pattern = Pattern::ALL[dice.pick(Pattern::ALL.len())];
        let topology = Topology::ALL[dice.pick(Topology::ALL.len())];

        let speed = (BASE_SPEED
            + SPEED_PER_TURN * ctx.turn_number.saturating_sub(1) as f64
            + SPEED_PER_COMBO * ctx.combo as f64)
            .min(MAX_SPEED);
        let mut width_scale = (1.0 - NARROW_PER_COMBO * ctx.combo as f64).max(MIN_WIDTH_SCALE);
        if ctx.mercy {
            width_scale *= MERCY_WIDEN;
        }

        // The event is rolled after the layout, so the layout needs a
        // provisional drift speed that the storm can override.
        let mut layout = ZoneLayout::generate(topology, width_scale, BASE_DRIFT_SPEED, dice);
        let event = if dice.chance(TURN_EVENT_CHANCE) {
            Some(if dice.pick(2) == 0 {
                TurnEvent::Storm
            } else {
                TurnEvent::Echo
            })
        } else {
            None
        };

        let mut jitter = BASE_JITTER;
        if ctx.weather.is_favorable() {
            jitter *= 0.5;
        } else if ctx.weather.is_harsh() {
            jitter *= 1.5;
        }
        if event == Some(TurnEvent::Storm) {
            jitter *= 2.0;
            layout.drift_speed = STORM_DRIFT_SPEED;
        }

        tracing::trace!(
            ?pattern,
            ?topology,
            ?event,
            speed,
            width_scale,
            jitter,
            "tuning bar armed"
        );

        self.state = BarState::Armed;
        self.pattern = pattern;
        self.speed = speed;
        self.layout = layout;
        self.event = event;
        self.jitter = jitter;
        self.elapsed_ms = 0.0;
        self.position = pattern.sample(0.0);
    }

    /// Advance the marker by `delta_ms`. Draws one jitter roll. No-op unless armed.
    pub fn update(&mut self, delta_ms: f64, dice: &mut dyn RandomSource) {
        if self.state != BarState::Armed {
            return;
        }
        self.elapsed_ms += delta_ms.max(0.0);
        let base = self.pattern.sample(self.elapsed_secs() * self.speed);
        let noise = dice.range(-1.0, 1.0) * self.jitter;
        self.position = (base + noise).clamp(0.0, 1.0);
    }

    /// Score the current marker position. Returns `None` unless armed.
    pub fn resolve(&mut self, quota: &PerfectQuota) -> Option<TuningResult> {
        if self.state != BarState::Armed {
            return None;
        }
        self.state = BarState::Resolved;

        let elapsed = self.elapsed_secs();
        let mut scored_at = self.position;
        let mut best = self.layout.evaluate(self.position, elapsed);
        let mut ghost_won = false;

        if let Some(ghost) = self.ghost_position() {
            if let Some(ghost_hit) = self.layout.evaluate(ghost, elapsed) {
                if best.as_ref().map_or(true, |b| ghost_hit.beats(b)) {
                    best = Some(ghost_hit);
                    scored_at = ghost;
                    ghost_won = true;
                }
            }
        }

        let raw_tier = best.map_or(0, |hit| hit.tier);
        let tier = quota.gate(raw_tier);
        Some(TuningResult {
            selection: MelodySelection {
                pitch: Tone::from_position(scored_at),
                tier,
            },
            raw_tier,
            position: scored_at,
            ghost_won,
        })
    }

    /// Drop back to idle without scoring.
    pub fn disarm(&mut self) {
        self.state = BarState::Idle;
    }

    pub fn state(&self) -> BarState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        self.state == BarState::Armed
    }

    /// Marker position in `[0, 1]`.
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Echo ghost position, when the Echo event is active.
    pub fn ghost_position(&self) -> Option<f64> {
        (self.event == Some(TurnEvent::Echo))
            .then(|| (self.position + ECHO_GHOST_OFFSET).rem_euclid(1.0))
    }

    pub fn pattern(&self) -> Pattern {
        self.pattern
    }

    /// Sweep speed in cycles per second.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn layout(&self) -> &ZoneLayout {
        &self.layout
    }

    pub fn event(&self) -> Option<TurnEvent> {
        self.event
    }

    /// Peak jitter added to the marker each frame.
    pub fn jitter(&self) -> f64 {
        self.jitter
    }

    fn elapsed_secs(&self) -> f64 {
        self.elapsed_ms / 1000.0
    }
}

impl Default for TuningBar {
    fn default() -> Self {
        Self::new()
    }
}

/// Selection used when the turn timer runs out: tier 1, uniformly random pitch.
pub fn timeout_selection(dice: &mut dyn RandomSource) -> MelodySelection {
    MelodySelection {
        pitch: Tone::ALL[dice.pick(TONE_COUNT)],
        tier: 1,
    }
}
