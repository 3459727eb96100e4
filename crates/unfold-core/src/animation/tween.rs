#![forbid(unsafe_code)]

//! Scalar tween with start delay and easing.
//!
//! # Invariants
//!
//! 1. `current()` equals `from` until the start delay has elapsed.
//! 2. `current()` equals `to` exactly once complete.
//! 3. A zero duration completes as soon as the delay has elapsed.

use std::time::Duration;

use super::{Animation, EasingFn, lerp, linear};

/// Interpolates a single `f32` property from `from` to `to`.
#[derive(Clone)]
pub struct Tween {
    from: f32,
    to: f32,
    duration: Duration,
    delay: Duration,
    elapsed: Duration,
    easing: EasingFn,
}

impl std::fmt::Debug for Tween {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tween")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("duration", &self.duration)
            .field("delay", &self.delay)
            .field("elapsed", &self.elapsed)
            .finish_non_exhaustive()
    }
}

impl Tween {
    /// Create a linear tween with no delay.
    #[must_use]
    pub fn new(from: f32, to: f32, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            delay: Duration::ZERO,
            elapsed: Duration::ZERO,
            easing: linear,
        }
    }

    /// Set the easing curve (builder pattern).
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Hold at `from` for `delay` before starting (builder pattern).
    #[must_use]
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    #[inline]
    pub fn start_value(&self) -> f32 {
        self.from
    }

    #[inline]
    pub fn end_value(&self) -> f32 {
        self.to
    }

    #[inline]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Linear (un-eased) progress through the active part of the tween.
    pub fn progress(&self) -> f32 {
        let active = self.elapsed.saturating_sub(self.delay);
        if self.duration.is_zero() {
            return if self.elapsed >= self.delay { 1.0 } else { 0.0 };
        }
        (active.as_secs_f64() / self.duration.as_secs_f64()).min(1.0) as f32
    }

    /// Current interpolated property value.
    pub fn current(&self) -> f32 {
        if self.is_complete() {
            return self.to;
        }
        lerp(self.from, self.to, self.value())
    }
}

impl Animation for Tween {
    fn tick(&mut self, dt: Duration) {
        if self.is_complete() {
            return;
        }
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.delay.saturating_add(self.duration)
    }

    fn value(&self) -> f32 {
        (self.easing)(self.progress())
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}
