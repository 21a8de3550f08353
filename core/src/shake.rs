use serde::{Deserialize, Serialize};

/// Minimum per-axis acceleration delta (m/s²) that counts as a shake.
pub const SHAKE_THRESHOLD: f64 = 30.0;

/// Minimum interval between two shake triggers, in milliseconds.
pub const SHAKE_DEBOUNCE_MS: i64 = 500;

/// One accelerometer reading.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MotionSample {
    pub t_ms: i64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Debounced shake-gesture detector.
///
/// Each sample is compared axis-by-axis against the previous one; when any
/// axis moves by more than the threshold, the detector fires — at most once
/// per debounce window. The first sample is compared against the origin, so
/// a violent opening sample fires immediately.
#[derive(Debug)]
pub struct ShakeDetector {
    threshold: f64,
    debounce_ms: i64,
    last_x: f64,
    last_y: f64,
    last_z: f64,
    last_fired_ms: Option<i64>,
}

impl Default for ShakeDetector {
    fn default() -> Self {
        ShakeDetector::new(SHAKE_THRESHOLD, SHAKE_DEBOUNCE_MS)
    }
}

impl ShakeDetector {
    #[must_use]
    pub fn new(threshold: f64, debounce_ms: i64) -> Self {
        ShakeDetector {
            threshold,
            debounce_ms,
            last_x: 0.0,
            last_y: 0.0,
            last_z: 0.0,
            last_fired_ms: None,
        }
    }

    /// Feed one sample; returns true when a shake trigger fires.
    pub fn feed(&mut self, sample: &MotionSample) -> bool {
        let delta_x = (sample.x - self.last_x).abs();
        let delta_y = (sample.y - self.last_y).abs();
        let delta_z = (sample.z - self.last_z).abs();

        let mut fired = false;
        if delta_x > self.threshold || delta_y > self.threshold || delta_z > self.threshold {
            let debounced = self
                .last_fired_ms
                .is_some_and(|t| sample.t_ms - t <= self.debounce_ms);
            if !debounced {
                self.last_fired_ms = Some(sample.t_ms);
                fired = true;
            }
        }

        self.last_x = sample.x;
        self.last_y = sample.y;
        self.last_z = sample.z;
        fired
    }

    /// Forget sample history and the debounce clock.
    pub fn reset(&mut self) {
        self.last_x = 0.0;
        self.last_y = 0.0;
        self.last_z = 0.0;
        self.last_fired_ms = None;
    }
}

/// Run a default detector over a recorded sample stream; returns the
/// timestamps at which it fired.
#[must_use]
pub fn replay(samples: &[MotionSample]) -> Vec<i64> {
    let mut detector = ShakeDetector::default();
    samples
        .iter()
        .filter(|s| detector.feed(s))
        .map(|s| s.t_ms)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(t_ms: i64, x: f64, y: f64, z: f64) -> MotionSample {
        MotionSample { t_ms, x, y, z }
    }

    #[test]
    fn test_below_threshold_never_fires() {
        let mut detector = ShakeDetector::default();
        // Gentle drift: every delta stays under 30
        for i in 0..50 {
            let v = f64::from(i % 10);
            assert!(!detector.feed(&sample(i64::from(i) * 16, v, -v, v / 2.0)));
        }
    }

    #[test]
    fn test_exact_threshold_does_not_fire() {
        let mut detector = ShakeDetector::default();
        // Delta must strictly exceed the threshold
        assert!(!detector.feed(&sample(0, SHAKE_THRESHOLD, 0.0, 0.0)));
    }

    #[test]
    fn test_above_threshold_fires() {
        let mut detector = ShakeDetector::default();
        assert!(!detector.feed(&sample(0, 1.0, 1.0, 1.0)));
        assert!(detector.feed(&sample(16, 35.0, 1.0, 1.0)));
    }

    #[test]
    fn test_any_axis_can_fire() {
        for axis in 0..3 {
            let mut detector = ShakeDetector::default();
            let mut s = sample(0, 0.0, 0.0, 0.0);
            match axis {
                0 => s.x = 31.0,
                1 => s.y = -31.0,
                _ => s.z = 31.0,
            }
            assert!(detector.feed(&s), "axis {axis} should fire");
        }
    }

    #[test]
    fn test_debounce_suppresses_rapid_retriggers() {
        let mut detector = ShakeDetector::default();
        // Alternating large swings: every sample's delta qualifies
        assert!(detector.feed(&sample(0, 40.0, 0.0, 0.0)));
        assert!(!detector.feed(&sample(100, -40.0, 0.0, 0.0)));
        assert!(!detector.feed(&sample(300, 40.0, 0.0, 0.0)));
        assert!(!detector.feed(&sample(500, -40.0, 0.0, 0.0)));
        // 501ms after the trigger: window elapsed, fires again
        assert!(detector.feed(&sample(501, 40.0, 0.0, 0.0)));
    }

    #[test]
    fn test_fires_again_after_window() {
        let mut detector = ShakeDetector::default();
        assert!(detector.feed(&sample(0, 40.0, 0.0, 0.0)));
        assert!(detector.feed(&sample(1000, -40.0, 0.0, 0.0)));
        assert!(detector.feed(&sample(2000, 40.0, 0.0, 0.0)));
    }

    #[test]
    fn test_quiet_period_resets_delta_base() {
        let mut detector = ShakeDetector::default();
        // Ramp up slowly past 30 total but never more than 10 per sample
        for (i, v) in [(0, 10.0), (1, 20.0), (2, 28.0), (3, 35.0)] {
            assert!(!detector.feed(&sample(i * 16, v, 0.0, 0.0)));
        }
        // Then a real jerk relative to the last sample
        assert!(detector.feed(&sample(64, 70.0, 0.0, 0.0)));
    }

    #[test]
    fn test_reset_clears_debounce() {
        let mut detector = ShakeDetector::default();
        assert!(detector.feed(&sample(0, 40.0, 0.0, 0.0)));
        detector.reset();
        assert!(detector.feed(&sample(10, 40.0, 0.0, 0.0)));
    }

    #[test]
    fn test_replay_counts_triggers() {
        let samples = vec![
            sample(0, 1.0, 0.0, 0.0),
            sample(100, 45.0, 0.0, 0.0),  // fires
            sample(200, -45.0, 0.0, 0.0), // debounced
            sample(900, 0.0, 50.0, 0.0),  // fires
            sample(1000, 0.0, 48.0, 0.0), // small delta, no fire
        ];
        assert_eq!(replay(&samples), vec![100, 900]);
    }
}
