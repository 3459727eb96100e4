#![forbid(unsafe_code)]

//! Frame-driven animation primitives.
//!
//! Animations are advanced explicitly with [`Animation::tick`]; there is no
//! clock inside this module. The host's frame loop owns time, which keeps
//! every transition deterministic under test.
//!
//! # Invariants
//!
//! 1. `value()` is a normalized, eased progress in [0.0, 1.0].
//! 2. `tick()` on a complete animation is a no-op.
//! 3. `reset()` returns an animation to its initial state.

use std::time::Duration;

mod easing;
mod tween;

pub use easing::{
    EasingFn, ease_in, ease_in_cubic, ease_in_out, ease_out, ease_out_cubic, fast_out_slow_in,
    linear,
};
pub use tween::Tween;

/// A time-driven animation producing a normalized value.
pub trait Animation {
    /// Advance the animation by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its end.
    fn is_complete(&self) -> bool;

    /// Current eased progress in [0.0, 1.0].
    fn value(&self) -> f32;

    /// Rewind to the initial state.
    fn reset(&mut self);
}

/// Linear interpolation between `from` and `to`.
#[inline]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(200.0, 0.0, 0.0), 200.0);
        assert_eq!(lerp(200.0, 0.0, 1.0), 0.0);
        assert_eq!(lerp(80.0, 800.0, 0.5), 440.0);
    }
}
