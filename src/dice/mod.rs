//! Dice — the single injectable random source behind every roll in a match.
//!
//! Tone generation, power-up triggers, stun rolls, opponent tiers, and the
//! tuning bar's pattern/jitter all draw from one [`RandomSource`]. Live play
//! uses [`SeededDice`] (ChaCha8, reproducible from a seed); tests use
//! [`ScriptedDice`] to force specific branches.

use std::collections::VecDeque;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// A source of uniform rolls in `[0.0, 1.0)`.
///
/// Only [`next_unit`](RandomSource::next_unit) is required; the helpers are
/// all derived from it so a scripted source controls every branch.
pub trait RandomSource {
    /// Next uniform value in `[0.0, 1.0)`.
    fn next_unit(&mut self) -> f64;

    /// Roll against a probability. `p <= 0` never hits, `p >= 1` always does.
    fn chance(&mut self, p: f64) -> bool {
        self.next_unit() < p
    }

    /// Uniform index in `0..n`. Returns 0 when `n == 0`.
    fn pick(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        ((self.next_unit() * n as f64) as usize).min(n - 1)
    }

    /// Uniform value in `[lo, hi)`.
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_unit()
    }

    /// Index chosen proportionally to `weights`. Zero-weight entries are
    /// never chosen; an all-zero table falls back to index 0.
    fn weighted(&mut self, weights: &[f64]) -> usize {
        let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return 0;
        }
        let roll = self.next_unit() * total;
        let mut acc = 0.0;
        let mut last_positive = 0;
        for (idx, &w) in weights.iter().enumerate() {
            if w <= 0.0 {
                continue;
            }
            acc += w;
            last_positive = idx;
            if roll < acc {
                return idx;
            }
        }
        last_positive
    }
}

/// Seeded ChaCha8 dice for live matches.
#[derive(Debug, Clone)]
pub struct SeededDice {
    rng: ChaCha8Rng,
}

impl SeededDice {
    /// Create dice from a seed. The same seed replays the same match.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededDice {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Dice that replay a fixed queue of rolls.
///
/// Once the queue is exhausted every roll returns the fallback value
/// (0.999 by default, so `chance(p)` misses for any `p < 0.999`).
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    rolls: VecDeque<f64>,
    fallback: f64,
    drawn: usize,
}

impl ScriptedDice {
    /// Create dice that replay `rolls` in order.
    pub fn new(rolls: impl IntoIterator<Item = f64>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            fallback: 0.999,
            drawn: 0,
        }
    }

    /// Set the value returned after the queue runs dry. Clamped below 1.0.
    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback.clamp(0.0, 0.999_999);
        self
    }

    /// Append more rolls to the end of the queue.
    pub fn push(&mut self, rolls: impl IntoIterator<Item = f64>) {
        self.rolls.extend(rolls);
    }

    /// Rolls still queued.
    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }

    /// Total rolls drawn so far, including fallbacks.
    pub fn drawn(&self) -> usize {
        self.drawn
    }
}

impl RandomSource for ScriptedDice {
    fn next_unit(&mut self) -> f64 {
        self.drawn += 1;
        self.rolls
            .pop_front()
            .map(|r| r.clamp(0.0, 0.999_999))
            .unwrap_or(self.fallback)
    }
}
