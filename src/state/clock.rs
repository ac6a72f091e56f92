//! Countdown clock shared by the game clock and the shot clock.
//!
//! A [`Clock`] only knows how to count down, stop itself at zero and latch its
//! buzzer. Durations to reset to are owned by the engine.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Smallest unit any scoreboard renders (centiseconds). A running clock whose
/// remaining time drops below this value is displayed as zero, so it lands on
/// exactly `0.0` and buzzes on that same tick.
pub const DISPLAY_RESOLUTION_SECONDS: f64 = 0.01;

/// Identifies one of the two clocks driven by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClockKind {
    /// Main game clock counting down the period.
    Game,
    /// Possession timer.
    Shot,
}

/// Per-clock state machine position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClockPhase {
    /// Stopped with time left on the clock.
    StoppedPositive,
    /// Counting down.
    Running,
    /// Stopped at exactly zero.
    StoppedZero,
}

/// A countdown clock with an edge-triggered buzzer latch.
#[derive(Debug, Clone, PartialEq)]
pub struct Clock {
    remaining: f64,
    running: bool,
    buzzer_latched: bool,
    cap: f64,
}

impl Clock {
    /// Build a stopped clock holding `seconds`, clamped into `[0, cap]`.
    pub fn new(seconds: f64, cap: f64) -> Self {
        let cap = sanitize(cap);
        Self {
            remaining: clamp_to(seconds, cap),
            running: false,
            buzzer_latched: false,
            cap,
        }
    }

    /// Remaining time in seconds.
    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    /// Whether the clock is currently counting down.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the buzzer already fired for the current zero-crossing.
    pub fn is_latched(&self) -> bool {
        self.buzzer_latched
    }

    /// Upper bound for the remaining time.
    pub fn cap(&self) -> f64 {
        self.cap
    }

    /// Current state machine position.
    pub fn phase(&self) -> ClockPhase {
        if self.running {
            ClockPhase::Running
        } else if self.remaining > 0.0 {
            ClockPhase::StoppedPositive
        } else {
            ClockPhase::StoppedZero
        }
    }

    /// Advance the clock by `dt` seconds. Returns `true` when this call fired
    /// the buzzer.
    ///
    /// A stopped clock ignores `dt`. Negative or non-finite deltas count as zero.
    pub fn tick(&mut self, dt: f64) -> bool {
        if !self.running {
            return false;
        }

        if self.remaining <= 0.0 {
            // Running at zero cannot be produced by the operations below; stop quietly.
            self.remaining = 0.0;
            self.running = false;
            return false;
        }

        let next = self.remaining - sanitize(dt);
        if next >= DISPLAY_RESOLUTION_SECONDS {
            self.remaining = next;
            return false;
        }

        self.remaining = 0.0;
        self.running = false;
        if self.buzzer_latched {
            return false;
        }
        self.buzzer_latched = true;
        true
    }

    /// Move the clock by `delta` seconds. Manual adjustments never buzz.
    pub fn adjust(&mut self, delta: f64) {
        let delta = if delta.is_finite() { delta } else { 0.0 };
        self.remaining = clamp_to(self.remaining + delta, self.cap);
        if self.remaining > 0.0 {
            self.buzzer_latched = false;
        } else {
            self.running = false;
        }
    }

    /// Start or stop the clock. A clock sitting at zero is refilled to `full`
    /// and left stopped instead of being started.
    pub fn toggle(&mut self, full: f64) -> ClockPhase {
        match self.phase() {
            ClockPhase::StoppedZero => self.reset(full),
            ClockPhase::StoppedPositive => self.running = true,
            ClockPhase::Running => self.running = false,
        }
        self.phase()
    }

    /// Stop the clock at `seconds` and re-arm the buzzer.
    pub fn reset(&mut self, seconds: f64) {
        self.remaining = clamp_to(seconds, self.cap);
        self.running = false;
        self.buzzer_latched = false;
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

fn clamp_to(value: f64, cap: f64) -> f64 {
    sanitize(value).min(cap)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(seconds: f64) -> Clock {
        let mut clock = Clock::new(seconds, 99.0);
        clock.toggle(seconds);
        clock
    }

    #[test]
    fn new_clock_is_stopped_and_clamped() {
        let clock = Clock::new(150.0, 99.0);
        assert_eq!(clock.remaining(), 99.0);
        assert_eq!(clock.phase(), ClockPhase::StoppedPositive);

        let clock = Clock::new(-3.0, 99.0);
        assert_eq!(clock.remaining(), 0.0);
        assert_eq!(clock.phase(), ClockPhase::StoppedZero);
    }

    #[test]
    fn stopped_clock_ignores_ticks() {
        let mut clock = Clock::new(10.0, 99.0);
        assert!(!clock.tick(4.0));
        assert_eq!(clock.remaining(), 10.0);
    }

    #[test]
    fn exact_landing_and_overshoot_both_stop_at_zero() {
        let mut exact = running(5.0);
        assert!(exact.tick(5.0));
        assert_eq!(exact.remaining(), 0.0);
        assert_eq!(exact.phase(), ClockPhase::StoppedZero);

        let mut overshoot = running(5.0);
        assert!(overshoot.tick(7.5));
        assert_eq!(overshoot.remaining(), 0.0);
        assert!(!overshoot.is_running());
    }

    #[test]
    fn sub_centisecond_remainder_is_displayed_zero() {
        let mut clock = running(1.0);
        assert!(clock.tick(0.995));
        assert_eq!(clock.remaining(), 0.0);
    }

    #[test]
    fn buzzer_fires_once_per_crossing() {
        let mut clock = running(1.0);
        assert!(clock.tick(2.0));
        assert!(!clock.tick(2.0));
        assert!(clock.is_latched());

        clock.adjust(3.0);
        assert!(!clock.is_latched());
        clock.toggle(24.0);
        assert!(clock.tick(3.0));
    }

    #[test]
    fn invalid_deltas_count_as_zero() {
        let mut clock = running(10.0);
        assert!(!clock.tick(-5.0));
        assert!(!clock.tick(f64::NAN));
        assert_eq!(clock.remaining(), 10.0);
    }

    #[test]
    fn adjust_to_zero_stops_without_buzzing() {
        let mut clock = running(4.0);
        clock.adjust(-10.0);
        assert_eq!(clock.remaining(), 0.0);
        assert_eq!(clock.phase(), ClockPhase::StoppedZero);
        assert!(!clock.is_latched());
        assert!(!clock.tick(1.0));
    }

    #[test]
    fn adjust_respects_cap() {
        let mut clock = Clock::new(95.0, 99.0);
        clock.adjust(10.0);
        assert_eq!(clock.remaining(), 99.0);
    }

    #[test]
    fn toggle_at_zero_refills_and_stays_stopped() {
        let mut clock = running(1.0);
        clock.tick(1.0);
        assert_eq!(clock.toggle(24.0), ClockPhase::StoppedPositive);
        assert_eq!(clock.remaining(), 24.0);
        assert!(!clock.is_latched());
        assert_eq!(clock.toggle(24.0), ClockPhase::Running);
        assert_eq!(clock.toggle(24.0), ClockPhase::StoppedPositive);
    }

    #[test]
    fn reset_rearms_and_stops() {
        let mut clock = running(2.0);
        clock.tick(3.0);
        clock.reset(14.0);
        assert_eq!(clock.remaining(), 14.0);
        assert!(!clock.is_running());
        assert!(!clock.is_latched());
    }
}
