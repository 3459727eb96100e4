#![forbid(unsafe_code)]

//! Page configuration.

use std::time::Duration;

use unfold_core::animation::{
    EasingFn, ease_in_cubic, ease_in_out, ease_out_cubic, fast_out_slow_in, linear,
};
use unfold_core::pull::PullConfig;

/// Alpha of a page at rest while expanded.
pub const EXPANDED_ALPHA: f32 = 1.0;

/// Default duration of expand, collapse, and restore animations.
pub const DEFAULT_ANIMATION_DURATION: Duration = Duration::from_millis(250);

/// Easing curve for page animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PageEasing {
    Linear,
    /// Cubic ease-in (accelerating).
    EaseIn,
    /// Cubic ease-out (decelerating).
    EaseOut,
    EaseInOut,
    /// Material standard curve.
    #[default]
    FastOutSlowIn,
}

impl PageEasing {
    /// The curve as a plain function pointer.
    pub fn curve(self) -> EasingFn {
        match self {
            Self::Linear => linear,
            Self::EaseIn => ease_in_cubic,
            Self::EaseOut => ease_out_cubic,
            Self::EaseInOut => ease_in_out,
            Self::FastOutSlowIn => fast_out_slow_in,
        }
    }

    /// Apply the curve to a progress value (0.0 to 1.0).
    pub fn apply(self, t: f32) -> f32 {
        (self.curve())(t)
    }
}

/// Configuration for an [`ExpandablePage`](crate::ExpandablePage).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PageConfig {
    /// Alpha the page starts from when expanding and fades to when
    /// collapsing (default: 0.0, fully transparent).
    pub collapsed_alpha: f32,
    /// Whether dragging the page down collapses it (default: true).
    pub pull_to_collapse_enabled: bool,
    /// Pull gesture thresholds.
    pub pull: PullConfig,
    /// Duration of page animations.
    pub animation_duration: Duration,
    /// Easing curve for page and toolbar animations.
    pub easing: PageEasing,
    /// Delay before page and toolbar animations start, for staggering
    /// against other concurrent animations (default: zero).
    pub start_delay: Duration,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            collapsed_alpha: 0.0,
            pull_to_collapse_enabled: true,
            pull: PullConfig::default(),
            animation_duration: DEFAULT_ANIMATION_DURATION,
            easing: PageEasing::default(),
            start_delay: Duration::ZERO,
        }
    }
}

impl PageConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// A configuration whose animations complete on the first tick.
    pub fn instant() -> Self {
        Self {
            animation_duration: Duration::ZERO,
            ..Default::default()
        }
    }

    /// Set the collapsed alpha, clamped to [0.0, 1.0].
    pub fn collapsed_alpha(mut self, alpha: f32) -> Self {
        self.collapsed_alpha = alpha.clamp(0.0, 1.0);
        self
    }

    pub fn pull_to_collapse(mut self, enabled: bool) -> Self {
        self.pull_to_collapse_enabled = enabled;
        self
    }

    /// Set the pull distance past which a release collapses the page.
    pub fn pull_threshold(mut self, distance: f32) -> Self {
        self.pull.collapse_threshold = distance.max(0.0);
        self
    }

    pub fn pull_config(mut self, pull: PullConfig) -> Self {
        self.pull = pull;
        self
    }

    pub fn animation_duration(mut self, duration: Duration) -> Self {
        self.animation_duration = duration;
        self
    }

    pub fn easing(mut self, easing: PageEasing) -> Self {
        self.easing = easing;
        self
    }

    pub fn start_delay(mut self, delay: Duration) -> Self {
        self.start_delay = delay;
        self
    }
}
