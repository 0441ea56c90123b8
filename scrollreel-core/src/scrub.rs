/// Below this distance the playhead snaps onto its target.
const SETTLE_EPSILON: f64 = 1e-4;

/// Eases a playhead toward a moving scroll target.
///
/// Scrolling sets the target; each tick the playhead covers most of the
/// remaining distance within `lag_seconds` (exponential approach with a
/// time constant of a third of the lag). A lag of zero tracks the target
/// exactly.
#[derive(Debug, Clone)]
pub struct Scrubber {
    current: f64,
    target: f64,
    lag_seconds: f64,
}

impl Scrubber {
    pub fn new(lag_seconds: f64) -> Self {
        Self {
            current: 0.0,
            target: 0.0,
            lag_seconds: sanitize_lag(lag_seconds),
        }
    }

    pub fn lag_seconds(&self) -> f64 {
        self.lag_seconds
    }

    pub fn set_lag(&mut self, lag_seconds: f64) {
        self.lag_seconds = sanitize_lag(lag_seconds);
    }

    pub fn value(&self) -> f64 {
        self.current
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn set_target(&mut self, target: f64) {
        if target.is_finite() {
            self.target = target;
        }
    }

    /// Jump straight to `value`, discarding any pending motion.
    pub fn snap_to(&mut self, value: f64) {
        if value.is_finite() {
            self.current = value;
            self.target = value;
        }
    }

    /// Advance by `dt` seconds toward the current target and return the new
    /// playhead value.
    pub fn advance(&mut self, dt: f64) -> f64 {
        if self.lag_seconds == 0.0 {
            self.current = self.target;
            return self.current;
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let tau = self.lag_seconds / 3.0;
        let blend = 1.0 - (-dt / tau).exp();
        self.current += (self.target - self.current) * blend;
        if (self.target - self.current).abs() < SETTLE_EPSILON {
            self.current = self.target;
        }
        self.current
    }

    /// True when the playhead has reached its target.
    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }
}

fn sanitize_lag(lag_seconds: f64) -> f64 {
    if lag_seconds.is_finite() && lag_seconds > 0.0 {
        lag_seconds
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_lag_tracks_target_exactly() {
        let mut s = Scrubber::new(0.0);
        s.set_target(0.42);
        assert_eq!(s.advance(0.016), 0.42);
        assert!(s.is_settled());
    }

    #[test]
    fn negative_or_nan_lag_is_treated_as_zero() {
        assert_eq!(Scrubber::new(-1.0).lag_seconds(), 0.0);
        assert_eq!(Scrubber::new(f64::NAN).lag_seconds(), 0.0);
    }

    #[test]
    fn lagged_playhead_moves_partway_then_settles() {
        let mut s = Scrubber::new(0.15);
        s.set_target(1.0);
        let first = s.advance(1.0 / 60.0);
        assert!(first > 0.0 && first < 1.0);
        assert!(!s.is_settled());

        let mut prev = first;
        for _ in 0..120 {
            let v = s.advance(1.0 / 60.0);
            assert!(v >= prev, "playhead must approach monotonically");
            prev = v;
        }
        assert!(s.is_settled());
        assert_eq!(s.value(), 1.0);
    }

    #[test]
    fn zero_dt_does_not_move() {
        let mut s = Scrubber::new(0.1);
        s.set_target(0.5);
        assert_eq!(s.advance(0.0), 0.0);
    }

    #[test]
    fn snap_discards_motion() {
        let mut s = Scrubber::new(0.1);
        s.set_target(1.0);
        s.snap_to(0.25);
        assert_eq!(s.value(), 0.25);
        assert!(s.is_settled());
    }
}
