// ============================================
// src/timer.rs
// Per-round countdown for Hard mode
// ============================================

#[derive(Debug, Clone, PartialEq)]
pub struct RoundTimer {
    duration: f64,
    remaining: Option<f64>,
}

impl RoundTimer {
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            remaining: None,
        }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Takes effect on the next `arm`.
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = duration;
    }

    /// Restarts the countdown from the full duration.
    pub fn arm(&mut self) {
        self.remaining = Some(self.duration);
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    pub fn is_armed(&self) -> bool {
        self.remaining.is_some()
    }

    pub fn remaining(&self) -> Option<f64> {
        self.remaining
    }

    /// Remaining share of the full duration, 1.0 at arm time.
    pub fn fraction(&self) -> Option<f64> {
        self.remaining.map(|r| {
            if self.duration > 0.0 {
                (r / self.duration).clamp(0.0, 1.0)
            } else {
                0.0
            }
        })
    }

    /// Counts down by `dt` seconds. Returns true on the tick that reaches zero.
    pub fn advance(&mut self, dt: f64) -> bool {
        let Some(remaining) = self.remaining else {
            return false;
        };
        if remaining <= 0.0 {
            return false;
        }
        let left = (remaining - dt).max(0.0);
        self.remaining = Some(left);
        left == 0.0
    }
}
