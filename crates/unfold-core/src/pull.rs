#![forbid(unsafe_code)]

//! Pull-to-collapse tracking: turns raw touch samples into pull verdicts.
//!
//! [`PullTracker`] is a stateful processor. Feed it every [`TouchEvent`] of a
//! gesture together with the page's current vertical translation; it answers
//! with at most one [`PullEvent`] per sample.
//!
//! # State Machine
//!
//! ```text
//! Idle ──Down──▶ Pending ──vertical past slop──▶ Pulling ──Up/Cancel──▶ Idle
//!                   │                                │
//!                   ├──horizontal past slop──▶ Ignored
//!                   └──interceptor vetoes────▶ Ignored
//! ```
//!
//! # Invariants
//!
//! 1. `Release` is only ever emitted after at least one `Pull` in the same
//!    gesture.
//! 2. The interceptor is consulted at most once per gesture, at the moment
//!    the gesture is classified as vertical.
//! 3. `collapse_eligible` on `Release` equals the verdict of the last `Pull`.
//!
//! # Failure Modes
//!
//! - `Move`/`Up` without a preceding `Down` are ignored.
//! - A `Cancel` mid-pull releases as not collapse-eligible, so the page
//!   settles back instead of collapsing on an aborted gesture.

/// Verdict of a pull-interception check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterceptResult {
    /// The host has no objection; tracking continues.
    Ignored,
    /// The host claims the gesture; the pull is not tracked.
    Intercepted,
}

/// A raw touch sample in page-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up { x: f32, y: f32 },
    Cancel,
}

/// Output of the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PullEvent {
    /// The page is being dragged.
    Pull {
        /// Raw finger movement since the previous sample.
        delta_y: f32,
        /// Translation the page should adopt now (friction applied).
        current_translation_y: f32,
        /// Whether the gesture as a whole is heading upward.
        upward_pull: bool,
        /// Whether this particular delta is upward.
        delta_upward_pull: bool,
        /// Whether releasing now should collapse the page.
        collapse_eligible: bool,
    },
    /// The finger lifted after a tracked pull.
    Release { collapse_eligible: bool },
}

/// Thresholds for pull tracking.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PullConfig {
    /// Minimum travel before a gesture is classified (default: 8.0).
    pub touch_slop: f32,
    /// Translation magnitude at which a release collapses (default: 56.0).
    pub collapse_threshold: f32,
    /// Divisor applied to upward deltas so pulling up feels heavier
    /// (default: 4.0).
    pub upward_friction: f32,
}

impl Default for PullConfig {
    fn default() -> Self {
        Self {
            touch_slop: 8.0,
            collapse_threshold: 56.0,
            upward_friction: 4.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Pending,
    Pulling,
    Ignored,
}

/// Stateful pull-to-collapse tracker.
#[derive(Debug, Clone)]
pub struct PullTracker {
    config: PullConfig,
    phase: Phase,
    down_x: f32,
    down_y: f32,
    last_y: f32,
    collapse_eligible: bool,
}

impl Default for PullTracker {
    fn default() -> Self {
        Self::new(PullConfig::default())
    }
}

impl PullTracker {
    #[must_use]
    pub fn new(config: PullConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            down_x: 0.0,
            down_y: 0.0,
            last_y: 0.0,
            collapse_eligible: false,
        }
    }

    pub fn config(&self) -> &PullConfig {
        &self.config
    }

    /// Update the collapse threshold; applies from the next sample.
    pub fn set_collapse_threshold(&mut self, threshold: f32) {
        self.config.collapse_threshold = threshold.max(0.0);
    }

    /// Whether a vertical pull is currently being tracked.
    #[inline]
    pub fn is_pulling(&self) -> bool {
        self.phase == Phase::Pulling
    }

    /// Drop any gesture in progress without emitting anything.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.collapse_eligible = false;
    }

    /// Process one touch sample.
    ///
    /// `current_translation_y` is the page's translation before this sample.
    /// `intercept` is called with `(down_x, down_y, upward)` when the gesture
    /// first turns out to be vertical.
    pub fn process<F>(
        &mut self,
        event: TouchEvent,
        current_translation_y: f32,
        intercept: F,
    ) -> Option<PullEvent>
    where
        F: FnOnce(f32, f32, bool) -> InterceptResult,
    {
        match event {
            TouchEvent::Down { x, y } => {
                self.phase = Phase::Pending;
                self.down_x = x;
                self.down_y = y;
                self.last_y = y;
                self.collapse_eligible = false;
                None
            }
            TouchEvent::Move { x, y } => self.on_move(x, y, current_translation_y, intercept),
            TouchEvent::Up { .. } => self.finish(self.collapse_eligible),
            TouchEvent::Cancel => self.finish(false),
        }
    }

    fn on_move<F>(
        &mut self,
        x: f32,
        y: f32,
        current_translation_y: f32,
        intercept: F,
    ) -> Option<PullEvent>
    where
        F: FnOnce(f32, f32, bool) -> InterceptResult,
    {
        match self.phase {
            Phase::Idle | Phase::Ignored => return None,
            Phase::Pending => {
                let dx = (x - self.down_x).abs();
                let dy = y - self.down_y;
                if dx.max(dy.abs()) < self.config.touch_slop {
                    return None;
                }
                if dx > dy.abs() {
                    self.phase = Phase::Ignored;
                    return None;
                }
                if intercept(self.down_x, self.down_y, dy < 0.0) == InterceptResult::Intercepted {
                    self.phase = Phase::Ignored;
                    return None;
                }
                self.phase = Phase::Pulling;
            }
            Phase::Pulling => {}
        }

        let delta_y = y - self.last_y;
        self.last_y = y;

        let upward_pull = y < self.down_y;
        let delta_upward_pull = delta_y < 0.0;
        let applied = if delta_upward_pull {
            delta_y / self.config.upward_friction.max(1.0)
        } else {
            delta_y
        };
        let translation = current_translation_y + applied;
        self.collapse_eligible = translation.abs() >= self.config.collapse_threshold;

        Some(PullEvent::Pull {
            delta_y,
            current_translation_y: translation,
            upward_pull,
            delta_upward_pull,
            collapse_eligible: self.collapse_eligible,
        })
    }

    fn finish(&mut self, collapse_eligible: bool) -> Option<PullEvent> {
        let was_pulling = self.phase == Phase::Pulling;
        self.reset();
        was_pulling.then_some(PullEvent::Release { collapse_eligible })
    }
}
