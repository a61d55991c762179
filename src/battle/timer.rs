//! Turn timer — counts down a millisecond budget fed by the render loop.

/// A countdown that reports its expiry exactly once.
#[derive(Debug, Clone)]
pub struct TurnTimer {
    budget_ms: u64,
    elapsed_ms: f64,
    fired: bool,
}

impl TurnTimer {
    /// A timer with `budget_ms` to spend.
    pub fn new(budget_ms: u64) -> Self {
        Self {
            budget_ms,
            elapsed_ms: 0.0,
            fired: false,
        }
    }

    /// Start the countdown over.
    pub fn reset(&mut self) {
        self.elapsed_ms = 0.0;
        self.fired = false;
    }

    /// Advance by `delta_ms`. Returns `true` on the call that crosses the
    /// budget and `false` on every other call, including later ones.
    pub fn advance(&mut self, delta_ms: f64) -> bool {
        if self.fired {
            return false;
        }
        self.elapsed_ms += delta_ms.max(0.0);
        if self.elapsed_ms >= self.budget_ms as f64 {
            self.fired = true;
            return true;
        }
        false
    }

    pub fn remaining_ms(&self) -> u64 {
        (self.budget_ms as f64 - self.elapsed_ms).max(0.0).ceil() as u64
    }

    pub fn budget_ms(&self) -> u64 {
        self.budget_ms
    }

    pub fn is_expired(&self) -> bool {
        self.fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_timer() {
        let t = TurnTimer::new(10_000);
        assert_eq!(t.remaining_ms(), 10_000);
        assert!(!t.is_expired());
    }

    #[test]
    fn expires_once() {
        let mut t = TurnTimer::new(1_000);
        assert!(!t.advance(600.0));
        assert!(t.advance(600.0));
        assert!(!t.advance(600.0));
        assert!(t.is_expired());
        assert_eq!(t.remaining_ms(), 0);
    }

    #[test]
    fn many_small_frames_accumulate() {
        let mut t = TurnTimer::new(1_000);
        let mut fired_at = None;
        for frame in 0..100 {
            if t.advance(16.0) {
                fired_at = Some(frame);
            }
        }
        // 63 frames = 1008 ms
        assert_eq!(fired_at, Some(62));
    }

    #[test]
    fn reset_rearms() {
        let mut t = TurnTimer::new(100);
        t.advance(200.0);
        t.reset();
        assert!(!t.is_expired());
        assert!(t.advance(100.0));
    }

    #[test]
    fn negative_delta_is_ignored() {
        let mut t = TurnTimer::new(100);
        t.advance(-50.0);
        assert_eq!(t.remaining_ms(), 100);
    }
}
