//! One-shot, time-boxed transform transitions.

use super::transform::ViewTransform;

/// Cubic ease-in-out on `[0, 1]`.
fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Interpolation from one transform to another over a fixed duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub from: ViewTransform,
    pub to: ViewTransform,
    start_ms: f64,
    duration_ms: f64,
}

impl Transition {
    pub fn new(from: ViewTransform, to: ViewTransform, start_ms: f64, duration_ms: f64) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms,
        }
    }

    /// Transform at `now_ms`, and whether the transition has finished.
    pub fn sample(&self, now_ms: f64) -> (ViewTransform, bool) {
        if self.duration_ms <= 0.0 {
            return (self.to, true);
        }
        let t = ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0);
        if t >= 1.0 {
            (self.to, true)
        } else {
            (self.from.lerp(&self.to, ease_in_out_cubic(t)), false)
        }
    }
}
