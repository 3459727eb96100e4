#![forbid(unsafe_code)]

//! Animation orchestration for a page.
//!
//! Three independent channels, each with at most one live animation:
//!
//! | Channel | Drives | Started by |
//! |---------|--------|------------|
//! | transition | alpha, translation y, translation x | expand, collapse, restore |
//! | dimensions | clipped width and height | expand, collapse |
//! | toolbar | page-relative toolbar position | expand, collapse, restore |
//!
//! Starting an animation on a channel replaces whatever ran there. A
//! cancelled animation reports nothing: its partial values stay applied and
//! no completion is produced.
//!
//! [`PageAnimator::tick`] advances every channel and returns a [`Frame`]
//! describing the values to apply, plus the transition that finished on this
//! tick, if any.

use std::time::Duration;

use bitflags::bitflags;
use unfold_core::animation::{Animation, Tween};

use crate::clip::Dimensions;

/// Which sequence a page transition belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    Expand,
    Collapse,
    /// Settle back to the expanded rest position after a released pull.
    Restore,
}

bitflags! {
    /// Presentation properties touched during a tick.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FrameChanges: u8 {
        const ALPHA       = 0b0000_0001;
        const TRANSLATION = 0b0000_0010;
        const CLIP        = 0b0000_0100;
        const TOOLBAR     = 0b0000_1000;
        const STATE       = 0b0001_0000;
        const VISIBILITY  = 0b0010_0000;
    }
}

impl FrameChanges {
    /// Whether the host needs to repaint.
    #[inline]
    pub fn needs_redraw(self) -> bool {
        !self.is_empty()
    }
}

#[derive(Debug, Clone)]
struct PageTransition {
    kind: TransitionKind,
    alpha: Tween,
    translation_y: Tween,
    translation_x: Option<Tween>,
}

impl PageTransition {
    fn tick(&mut self, dt: Duration) {
        self.alpha.tick(dt);
        self.translation_y.tick(dt);
        if let Some(tx) = &mut self.translation_x {
            tx.tick(dt);
        }
    }

    fn is_complete(&self) -> bool {
        self.alpha.is_complete()
            && self.translation_y.is_complete()
            && self.translation_x.as_ref().is_none_or(Tween::is_complete)
    }
}

#[derive(Debug, Clone)]
struct DimensionTransition {
    width: Tween,
    height: Tween,
    reset_on_finish: bool,
}

#[derive(Debug, Clone)]
struct ToolbarTransition {
    show: bool,
    tween: Tween,
}

/// Target values of a page transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionTarget {
    pub alpha: f32,
    pub translation_y: f32,
    /// `None` leaves the horizontal translation alone.
    pub translation_x: Option<f32>,
}

/// Values produced by one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub alpha: Option<f32>,
    pub translation_x: Option<f32>,
    pub translation_y: Option<f32>,
    pub dimensions: Option<Dimensions>,
    /// The dimension animation landed on the full laid-out size.
    pub reset_clipping: bool,
    /// `(show, page translation)` to feed the toolbar synchronizer.
    pub toolbar: Option<(bool, f32)>,
    /// The page transition that completed on this tick.
    pub finished: Option<TransitionKind>,
}

/// Shared timing for the animations of one request.
#[derive(Debug, Clone, Copy)]
pub struct Timing {
    pub duration: Duration,
    pub delay: Duration,
    pub easing: fn(f32) -> f32,
}

impl Timing {
    fn tween(&self, from: f32, to: f32) -> Tween {
        Tween::new(from, to, self.duration)
            .easing(self.easing)
            .delay(self.delay)
    }
}

/// Drives the animation channels of a single page.
#[derive(Debug, Default)]
pub struct PageAnimator {
    transition: Option<PageTransition>,
    dimensions: Option<DimensionTransition>,
    toolbar: Option<ToolbarTransition>,
}

impl PageAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a page transition from the current values, replacing any
    /// transition in flight.
    pub fn start_transition(
        &mut self,
        kind: TransitionKind,
        alpha: f32,
        translation_x: f32,
        translation_y: f32,
        target: TransitionTarget,
        timing: Timing,
    ) {
        self.transition = Some(PageTransition {
            kind,
            alpha: timing.tween(alpha, target.alpha),
            translation_y: timing.tween(translation_y, target.translation_y),
            translation_x: target
                .translation_x
                .map(|tx| timing.tween(translation_x, tx)),
        });
    }

    pub fn start_dimensions(
        &mut self,
        from: Dimensions,
        to: Dimensions,
        reset_on_finish: bool,
        timing: Timing,
    ) {
        self.dimensions = Some(DimensionTransition {
            width: timing.tween(from.width, to.width),
            height: timing.tween(from.height, to.height),
            reset_on_finish,
        });
    }

    /// Ramp the toolbar between two page translations.
    pub fn start_toolbar(&mut self, show: bool, from: f32, to: f32, timing: Timing) {
        self.toolbar = Some(ToolbarTransition {
            show,
            tween: timing.tween(from, to),
        });
    }

    /// Cancel the page transition. Returns the kind that was cancelled.
    pub fn cancel_transition(&mut self) -> Option<TransitionKind> {
        self.transition.take().map(|t| t.kind)
    }

    pub fn cancel_dimensions(&mut self) -> bool {
        self.dimensions.take().is_some()
    }

    pub fn cancel_toolbar(&mut self) -> bool {
        self.toolbar.take().is_some()
    }

    pub fn transition_kind(&self) -> Option<TransitionKind> {
        self.transition.as_ref().map(|t| t.kind)
    }

    pub fn is_toolbar_running(&self) -> bool {
        self.toolbar.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.transition.is_some() || self.dimensions.is_some() || self.toolbar.is_some()
    }

    /// Advance all channels by `dt`.
    pub fn tick(&mut self, dt: Duration) -> Frame {
        let mut frame = Frame::default();

        if let Some(t) = &mut self.transition {
            t.tick(dt);
            frame.alpha = Some(t.alpha.current());
            frame.translation_y = Some(t.translation_y.current());
            frame.translation_x = t.translation_x.as_ref().map(Tween::current);
            if t.is_complete() {
                frame.finished = Some(t.kind);
                self.transition = None;
            }
        }

        if let Some(d) = &mut self.dimensions {
            d.width.tick(dt);
            d.height.tick(dt);
            frame.dimensions = Some(Dimensions::new(d.width.current(), d.height.current()));
            if d.width.is_complete() && d.height.is_complete() {
                frame.reset_clipping = d.reset_on_finish;
                self.dimensions = None;
            }
        }

        if let Some(tb) = &mut self.toolbar {
            tb.tween.tick(dt);
            frame.toolbar = Some((tb.show, tb.tween.current()));
            if tb.tween.is_complete() {
                self.toolbar = None;
            }
        }

        frame
    }
}
