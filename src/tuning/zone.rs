//! Scoring zones — where on the track a click earns which tier.
//!
//! Three layout topologies:
//! - concentric: all tiers share one center, narrowest ring is the highest tier
//! - dual-far: two widely separated tier-3 zones and nothing else
//! - scattered: one zone per tier, each at its own well-separated center

use std::f64::consts::TAU;

use crate::dice::RandomSource;

/// A scoring zone on the normalized `[0, 1]` track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zone {
    /// Resting center; the live center drifts around it.
    pub center: f64,
    pub half_width: f64,
    pub tier: u8,
}

impl Zone {
    pub fn new(center: f64, half_width: f64, tier: u8) -> Self {
        Self {
            center,
            half_width,
            tier,
        }
    }

    /// Distance from `pos` to `center`, in units of half-width.
    /// Values ≤ 1 are inside the zone.
    pub fn normalized_distance(&self, pos: f64, center: f64) -> f64 {
        if self.half_width <= 0.0 {
            return f64::INFINITY;
        }
        (pos - center).abs() / self.half_width
    }
}

/// How zones are arranged for a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    Concentric,
    DualFar,
    Scattered,
}

impl Topology {
    pub const ALL: [Topology; 3] = [Topology::Concentric, Topology::DualFar, Topology::Scattered];
}

/// A zone hit: which tier, and how close to the zone's center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneHit {
    pub tier: u8,
    pub distance: f64,
}

impl ZoneHit {
    /// Higher tier wins; equal tiers go to the smaller distance.
    pub fn beats(&self, other: &ZoneHit) -> bool {
        self.tier > other.tier || (self.tier == other.tier && self.distance < other.distance)
    }
}

/// A laid-out set of zones with their drift.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneLayout {
    pub topology: Topology,
    pub zones: Vec<Zone>,
    /// Drift oscillations per second.
    pub drift_speed: f64,
    /// Peak drift away from the resting center.
    pub drift_amplitude: f64,
}

const CONCENTRIC_WIDTHS: [(u8, f64); 3] = [(1, 0.16), (2, 0.09), (3, 0.035)];
const SCATTERED_WIDTHS: [(u8, f64); 3] = [(3, 0.04), (2, 0.08), (1, 0.12)];
const SCATTERED_SLOTS: [f64; 3] = [0.18, 0.5, 0.82];
const DUAL_FAR_WIDTH: f64 = 0.06;
const DRIFT_AMPLITUDE: f64 = 0.04;

impl ZoneLayout {
    /// Lay out zones for `topology`, scaling every half-width by `width_scale`.
    ///
    /// Draw order: concentric takes one center roll; dual-far takes two;
    /// scattered takes a slot pick for tier 3, a slot pick for tier 2, then
    /// one offset roll per zone.
    pub fn generate(
        topology: Topology,
        width_scale: f64,
        drift_speed: f64,
        dice: &mut dyn RandomSource,
    ) -> Self {
        let zones = match topology {
            Topology::Concentric => {
                let center = dice.range(0.25, 0.75);
                CONCENTRIC_WIDTHS
                    .iter()
                    .map(|&(tier, hw)| Zone::new(center, hw * width_scale, tier))
                    .collect()
            }
            Topology::DualFar => {
                let left = dice.range(0.08, 0.28);
                let right = dice.range(0.72, 0.92);
                vec![
                    Zone::new(left, DUAL_FAR_WIDTH * width_scale, 3),
                    Zone::new(right, DUAL_FAR_WIDTH * width_scale, 3),
                ]
            }
            Topology::Scattered => {
                let mut slots: Vec<f64> = SCATTERED_SLOTS.to_vec();
                let mut centers = Vec::with_capacity(3);
                for _ in 0..2 {
                    let idx = dice.pick(slots.len());
                    centers.push(slots.remove(idx));
                }
                centers.extend(slots);
                SCATTERED_WIDTHS
                    .iter()
                    .zip(centers)
                    .map(|(&(tier, hw), slot)| {
                        let center = (slot + dice.range(-0.05, 0.05)).clamp(0.0, 1.0);
                        Zone::new(center, hw * width_scale, tier)
                    })
                    .collect()
            }
        };
        Self {
            topology,
            zones,
            drift_speed,
            drift_amplitude: DRIFT_AMPLITUDE,
        }
    }

    /// Live center of `zone` after `elapsed_secs` of drift.
    pub fn center_at(&self, zone: &Zone, elapsed_secs: f64) -> f64 {
        let offset = self.drift_amplitude * (TAU * self.drift_speed * elapsed_secs).sin();
        (zone.center + offset).clamp(0.0, 1.0)
    }

    /// Best zone hit for a marker at `pos`, or `None` if no zone contains it.
    pub fn evaluate(&self, pos: f64, elapsed_secs: f64) -> Option<ZoneHit> {
        let mut best: Option<ZoneHit> = None;
        for zone in &self.zones {
            let distance = zone.normalized_distance(pos, self.center_at(zone, elapsed_secs));
            if distance > 1.0 {
                continue;
            }
            let hit = ZoneHit {
                tier: zone.tier,
                distance,
            };
            if best.as_ref().map_or(true, |b| hit.beats(b)) {
                best = Some(hit);
            }
        }
        best
    }

    /// Widest half-width in the layout.
    pub fn widest(&self) -> f64 {
        self.zones.iter().map(|z| z.half_width).fold(0.0, f64::max)
    }
}
