//! Oscillation patterns that sweep the tuning-bar marker across the track.

use std::f64::consts::TAU;

/// Waveform the marker follows. All map a phase in cycles to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Sine,
    Sawtooth,
    PingPong,
}

impl Pattern {
    pub const ALL: [Pattern; 3] = [Pattern::Sine, Pattern::Sawtooth, Pattern::PingPong];

    /// Marker position for `phase` (in cycles).
    pub fn sample(self, phase: f64) -> f64 {
        let frac = phase.rem_euclid(1.0);
        match self {
            Pattern::Sine => 0.5 + 0.5 * (TAU * phase).sin(),
            Pattern::Sawtooth => frac,
            Pattern::PingPong => 1.0 - (2.0 * frac - 1.0).abs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn sine_starts_centered() {
        assert_approx_eq!(Pattern::Sine.sample(0.0), 0.5);
        assert_approx_eq!(Pattern::Sine.sample(0.25), 1.0);
        assert_approx_eq!(Pattern::Sine.sample(0.75), 0.0);
    }

    #[test]
    fn sawtooth_wraps() {
        assert_approx_eq!(Pattern::Sawtooth.sample(0.3), 0.3);
        assert_approx_eq!(Pattern::Sawtooth.sample(1.3), 0.3);
    }

    #[test]
    fn ping_pong_reflects() {
        assert_approx_eq!(Pattern::PingPong.sample(0.0), 0.0);
        assert_approx_eq!(Pattern::PingPong.sample(0.25), 0.5);
        assert_approx_eq!(Pattern::PingPong.sample(0.5), 1.0);
        assert_approx_eq!(Pattern::PingPong.sample(0.75), 0.5);
    }

    #[test]
    fn every_pattern_stays_on_track() {
        for pattern in Pattern::ALL {
            for i in 0..200 {
                let v = pattern.sample(i as f64 * 0.037);
                assert!((0.0..=1.0).contains(&v), "{pattern:?} left the track: {v}");
            }
        }
    }
}
