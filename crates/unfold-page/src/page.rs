#![forbid(unsafe_code)]

//! The expandable page.
//!
//! [`ExpandablePage`] morphs out of a list item into a full-surface panel and
//! back. It is headless: the host reads the presentation properties
//! (translation, alpha, visibility, clipped dimensions) after each
//! [`tick`](ExpandablePage::tick) and renders them however it likes.
//!
//! # Expand/collapse cycle
//!
//! ```text
//! expand(item)                         collapse(item)
//!   align over item                      acquire layout suppression
//!   AboutToExpand → Expanding            start transition back to item
//!   start transition                     AboutToCollapse → Collapsing
//!   ... tick ...                         ... tick ...
//!   Expanded, FullyCovered, Expanded     release suppression, hide
//!                                        Collapsed, Collapsed
//! ```
//!
//! # Reacting from listeners
//!
//! Listeners cannot borrow the page they are listening to. They queue
//! expand or collapse calls through [`ExpandablePage::requests`]; see
//! [`crate::request`].
//!
//! # Interruption
//!
//! The most recent request wins. Starting a transition cancels the previous
//! one without firing its completion callbacks; its partial values stay
//! applied and become the starting point of the new transition.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::thread::JoinHandle;
use std::time::Duration;

use unfold_core::capability::LayoutCapability;
use unfold_core::geometry::{Rect, Size};
use unfold_core::pull::{InterceptResult, PullEvent, PullTracker, TouchEvent};

use crate::animator::{FrameChanges, PageAnimator, Timing, TransitionKind, TransitionTarget};
use crate::clip::{Dimensions, GeometryClipper};
use crate::config::{EXPANDED_ALPHA, PageConfig};
use crate::dispatch::{Dispatcher, PageEvent, PageHooks, PageListener, Subscription};
use crate::error::{PageError, Result};
use crate::nested::{ChildKind, DrawSuppressor};
use crate::request::{PageRequest, PageRequests};
use crate::state::{PageState, Visibility};
use crate::toolbar::{Toolbar, ToolbarSync};

/// Bounds of the list item a page expands from or collapses into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExpandedItem {
    pub location: Rect,
}

impl ExpandedItem {
    pub const fn new(location: Rect) -> Self {
        Self { location }
    }

    pub const fn at(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self::new(Rect::new(x, y, width, height))
    }
}

impl From<Rect> for ExpandedItem {
    fn from(location: Rect) -> Self {
        Self::new(location)
    }
}

/// What happened to a touch sample handed to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchDispatch {
    /// Consumed without reaching the page's children.
    Swallowed,
    /// Claimed by the pull-to-collapse gesture.
    Intercepted,
    /// Should be delivered to the page's children.
    Forwarded,
}

type PullInterceptor = dyn Fn(f32, f32, bool) -> InterceptResult;

/// An expandable, pull-to-collapse page.
pub struct ExpandablePage {
    config: PageConfig,
    state: PageState,
    visibility: Visibility,
    alpha: f32,
    translation_x: f32,
    translation_y: f32,
    layout: Option<Size>,
    clipper: GeometryClipper,
    toolbar: ToolbarSync,
    animator: PageAnimator,
    dispatcher: Dispatcher,
    requests: PageRequests,
    draw_suppressor: Rc<DrawSuppressor>,
    nested: Option<Rc<RefCell<ExpandablePage>>>,
    pull: PullTracker,
    interceptor: Box<PullInterceptor>,
    capability: LayoutCapability,
    layout_suppressed: bool,
    pending_immediate_expand: bool,
}

impl fmt::Debug for ExpandablePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpandablePage")
            .field("state", &self.state)
            .field("visibility", &self.visibility)
            .field("alpha", &self.alpha)
            .field("translation", &(self.translation_x, self.translation_y))
            .field("layout", &self.layout)
            .field("clipped", &self.clipper.dimensions())
            .field("animating", &self.animator.is_running())
            .field("nested", &self.nested.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for ExpandablePage {
    fn default() -> Self {
        Self::new(PageConfig::default())
    }
}

impl ExpandablePage {
    /// A collapsed, invisible page without bulk-layout support.
    pub fn new(config: PageConfig) -> Self {
        Self::with_capability(config, LayoutCapability::unsupported())
    }

    pub fn with_capability(config: PageConfig, capability: LayoutCapability) -> Self {
        let pull = PullTracker::new(config.pull.clone());
        Self {
            config,
            state: PageState::Collapsed,
            visibility: Visibility::Invisible,
            alpha: EXPANDED_ALPHA,
            translation_x: 0.0,
            translation_y: 0.0,
            layout: None,
            clipper: GeometryClipper::default(),
            toolbar: ToolbarSync::default(),
            animator: PageAnimator::new(),
            dispatcher: Dispatcher::new(),
            requests: PageRequests::new(),
            draw_suppressor: Rc::new(DrawSuppressor::new()),
            nested: None,
            pull,
            interceptor: Box::new(|_, _, _| InterceptResult::Ignored),
            capability,
            layout_suppressed: false,
            pending_immediate_expand: false,
        }
    }

    /// Install lifecycle hooks (builder pattern).
    #[must_use]
    pub fn with_hooks(mut self, hooks: impl PageHooks + 'static) -> Self {
        self.dispatcher.set_hooks(Box::new(hooks));
        self
    }

    // --- Host lifecycle ---

    /// Call once the page joins the host surface. Starts resolving the
    /// layout capability in the background.
    pub fn attach(&self) -> Option<JoinHandle<()>> {
        self.capability.warm_up()
    }

    /// Report the laid-out size. Runs a deferred
    /// [`expand_immediately`](Self::expand_immediately).
    pub fn set_layout_size(&mut self, size: Size) {
        self.layout = Some(size);
        self.clipper.set_full_size(size);
        if std::mem::take(&mut self.pending_immediate_expand)
            && !self.state.is_expanded_or_expanding()
        {
            self.complete_immediate_expand();
        }
    }

    /// Host-driven visibility change. Hiding the page drops any gesture in
    /// progress.
    pub fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;
        if visibility != Visibility::Visible {
            self.pull.reset();
        }
    }

    // --- Collaborators ---

    /// Link (or unlink) the toolbar the page keeps in sync.
    pub fn set_toolbar(&mut self, toolbar: Option<&Rc<RefCell<Toolbar>>>) {
        match toolbar {
            Some(toolbar) => self.toolbar.attach(toolbar),
            None => self.toolbar.detach(),
        }
    }

    pub fn set_container_listener(&mut self, listener: Option<Rc<dyn PageListener>>) {
        self.dispatcher.set_container_listener(listener);
    }

    pub fn subscribe(&mut self, listener: Rc<dyn PageListener>) -> Subscription {
        self.dispatcher.subscribe(listener)
    }

    /// Handle for listeners that need to expand or collapse the page from
    /// inside a callback.
    pub fn requests(&self) -> PageRequests {
        self.requests.clone()
    }

    /// Apply the requests queued so far, in order.
    ///
    /// # Errors
    ///
    /// The first error stops the batch; requests after it are dropped.
    pub fn apply_requests(&mut self) -> Result<()> {
        for request in self.requests.take_batch() {
            match request {
                PageRequest::Expand(item) => self.expand(&item)?,
                PageRequest::ExpandImmediately => self.expand_immediately()?,
                PageRequest::Collapse(item) => self.collapse(&item)?,
            }
        }
        Ok(())
    }

    /// Let the host veto pull-to-collapse for a gesture. Called with
    /// `(down_x, down_y, upward)`.
    pub fn set_pull_interceptor<F>(&mut self, interceptor: F)
    where
        F: Fn(f32, f32, bool) -> InterceptResult + 'static,
    {
        self.interceptor = Box::new(interceptor);
    }

    pub fn set_pull_to_collapse_enabled(&mut self, enabled: bool) {
        self.config.pull_to_collapse_enabled = enabled;
        if !enabled {
            self.pull.reset();
        }
    }

    pub fn set_pull_threshold(&mut self, distance: f32) {
        self.config.pull.collapse_threshold = distance.max(0.0);
        self.pull.set_collapse_threshold(distance);
    }

    /// Stack `nested` on top of this page. The previous nested page, if any,
    /// stops reporting to this one.
    pub fn set_nested_page(&mut self, nested: Rc<RefCell<ExpandablePage>>) {
        self.clear_nested_page();
        let listener: Rc<dyn PageListener> = self.draw_suppressor.clone();
        nested
            .borrow_mut()
            .dispatcher
            .set_nested_listener(Some(listener));
        self.nested = Some(nested);
    }

    pub fn clear_nested_page(&mut self) {
        if let Some(old) = self.nested.take() {
            old.borrow_mut().dispatcher.set_nested_listener(None);
        }
    }

    /// Whether a parent page is listening to this page.
    pub fn has_parent_listener(&self) -> bool {
        self.dispatcher.has_nested_listener()
    }

    // --- Transitions ---

    /// Animate open out of `item`.
    ///
    /// No-op while expanded or expanding.
    ///
    /// # Errors
    ///
    /// [`PageError::LayoutUnknown`] if the page has no laid-out size yet and
    /// is not [`Visibility::Gone`].
    pub fn expand(&mut self, item: &ExpandedItem) -> Result<()> {
        if self.layout.is_none() && self.visibility != Visibility::Gone {
            return Err(PageError::LayoutUnknown);
        }
        if self.state.is_expanded_or_expanding() {
            return Ok(());
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "page.expand",
            from = ?self.state,
            item = ?item.location,
            duration_ms = self.config.animation_duration.as_millis() as u64
        );

        self.align_with_item(item);
        self.dispatch_about_to_expand(self.config.animation_duration);
        let target = self.layout.unwrap_or(Size::ZERO);
        self.animate_expand_collapse(true, target, item)
    }

    /// Show the page fully expanded without animating.
    ///
    /// If the page has not been laid out yet, covering the surface and the
    /// expand callbacks wait for [`set_layout_size`](Self::set_layout_size).
    pub fn expand_immediately(&mut self) -> Result<()> {
        if self.state.is_expanded_or_expanding() {
            return Ok(());
        }
        self.stop_any_ongoing_animation()?;
        self.animator.cancel_dimensions();
        self.visibility = Visibility::Visible;
        self.alpha = EXPANDED_ALPHA;
        self.toolbar.update(false, 0.0);

        if self.layout.is_some() {
            self.complete_immediate_expand();
        } else {
            self.pending_immediate_expand = true;
        }
        Ok(())
    }

    /// Animate shut into `item`.
    ///
    /// No-op while collapsed or collapsing. A zero-width item collapses at
    /// full width.
    ///
    /// # Errors
    ///
    /// [`PageError::Capability`] if the layout capability probe failed. The
    /// page is left untouched.
    pub fn collapse(&mut self, item: &ExpandedItem) -> Result<()> {
        if self.state.is_collapsed_or_collapsing() {
            return Ok(());
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "page.collapse",
            from = ?self.state,
            item = ?item.location,
            duration_ms = self.config.animation_duration.as_millis() as u64
        );

        let rect = item.location;
        let width = if rect.width == 0 {
            self.layout.map_or(0, |size| size.width)
        } else {
            rect.width
        };
        self.animate_expand_collapse(false, Size::new(width, rect.height), item)?;
        self.dispatch_about_to_collapse(self.config.animation_duration);
        Ok(())
    }

    /// Drop clipping and snap to the surface origin.
    pub fn align_to_cover(&mut self) {
        self.animator.cancel_dimensions();
        self.clipper.reset_clipping();
        self.translation_x = 0.0;
        self.translation_y = 0.0;
    }

    /// Start the expand or collapse animation towards `target` size.
    ///
    /// Does not change the page state or fire "about to" events; use
    /// [`expand`](Self::expand) and [`collapse`](Self::collapse) for the full
    /// sequence.
    pub fn animate_expand_collapse(
        &mut self,
        expanding: bool,
        target: Size,
        item: &ExpandedItem,
    ) -> Result<()> {
        let rect = item.location;
        let toolbar_bottom = self.toolbar.bottom();

        let mut target_ty = if expanding { 0.0 } else { rect.top() as f32 };
        let target_tx = if expanding { 0.0 } else { rect.left() as f32 };
        // Without a known item, stop below the toolbar rather than behind it.
        if !expanding && rect.height == 0 {
            target_ty = target_ty.max(toolbar_bottom.unwrap_or(0.0));
        }

        if expanding {
            self.release_layout_suppression()?;
            self.visibility = Visibility::Visible;
        } else {
            self.acquire_layout_suppression()?;
        }

        self.alpha = if expanding {
            self.config.collapsed_alpha
        } else {
            EXPANDED_ALPHA
        };
        self.animator.cancel_transition();
        self.animator.cancel_toolbar();

        let (kind, target_alpha) = if expanding {
            (TransitionKind::Expand, EXPANDED_ALPHA)
        } else {
            (TransitionKind::Collapse, self.config.collapsed_alpha)
        };
        self.animator.start_transition(
            kind,
            self.alpha,
            self.translation_x,
            self.translation_y,
            TransitionTarget {
                alpha: target_alpha,
                translation_y: target_ty,
                translation_x: Some(target_tx),
            },
            self.timing(self.config.animation_duration),
        );

        if let Some(bottom) = toolbar_bottom {
            // Keep the toolbar fully shown even if the page ends up behind it.
            let toolbar_target = if expanding {
                target_ty
            } else {
                target_ty.max(bottom)
            };
            self.animate_toolbar(!expanding, toolbar_target);
        }
        self.animate_dimensions(target);
        Ok(())
    }

    /// Cancel the page transition and toolbar animation. No completion
    /// callbacks fire; layout suppression is released.
    pub fn stop_any_ongoing_animation(&mut self) -> Result<()> {
        self.animator.cancel_transition();
        self.animator.cancel_toolbar();
        self.release_layout_suppression()
    }

    // --- Gestures ---

    /// Apply one pull sample.
    pub fn on_pull(
        &mut self,
        delta_y: f32,
        current_translation_y: f32,
        upward_pull: bool,
        delta_upward_pull: bool,
        collapse_eligible: bool,
    ) {
        #[cfg(feature = "tracing")]
        tracing::trace!(
            message = "page.pull",
            delta_y,
            current_translation_y,
            upward_pull,
            delta_upward_pull,
            collapse_eligible
        );

        // The page may be pulled before the expand finished hiding the toolbar.
        self.animator.cancel_toolbar();
        if self.animator.transition_kind() == Some(TransitionKind::Restore) {
            self.animator.cancel_transition();
        }
        self.translation_y = current_translation_y;
        self.toolbar
            .update(current_translation_y > 0.0, current_translation_y);
        self.dispatch(PageEvent::Pull {
            delta_y,
            current_translation_y,
            upward_pull,
            delta_upward_pull,
            collapse_eligible,
        });
    }

    /// End a pull.
    ///
    /// Requests queued by release listeners are applied first. After that,
    /// a release that is not collapse-eligible settles the page back to its
    /// expanded rest position unless a listener started a collapse. An
    /// eligible release never collapses on its own: a listener does it
    /// through [`requests`](Self::requests).
    pub fn on_release(&mut self, collapse_eligible: bool) -> Result<()> {
        self.dispatch(PageEvent::Release { collapse_eligible });
        self.apply_requests()?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "page.release",
            collapse_eligible,
            state = ?self.state,
            translation_y = self.translation_y
        );

        if collapse_eligible || self.state.is_collapsed_or_collapsing() {
            return Ok(());
        }

        self.set_state(PageState::Expanded);
        self.stop_any_ongoing_animation()?;
        if self.toolbar.is_attached() {
            self.animate_toolbar(false, 0.0);
        }
        if self.translation_y != 0.0 {
            let timing = Timing {
                delay: Duration::ZERO,
                ..self.timing(self.config.animation_duration)
            };
            self.animator.start_transition(
                TransitionKind::Restore,
                self.alpha,
                self.translation_x,
                self.translation_y,
                TransitionTarget {
                    alpha: EXPANDED_ALPHA,
                    translation_y: 0.0,
                    translation_x: None,
                },
                timing,
            );
        }
        Ok(())
    }

    /// Feed a raw touch sample through pull-to-collapse and report where it
    /// should go.
    ///
    /// Only an expanded page reacts to touches. In every other state the
    /// sample is swallowed and any gesture in progress is dropped.
    pub fn handle_touch(&mut self, event: TouchEvent) -> Result<TouchDispatch> {
        if !self.state.is_expanded() {
            self.pull.reset();
            return Ok(TouchDispatch::Swallowed);
        }
        let mut intercepted = false;
        if self.config.pull_to_collapse_enabled && self.visibility == Visibility::Visible {
            let nested = self.nested.as_ref();
            let interceptor = &*self.interceptor;
            let verdict = self.pull.process(event, self.translation_y, |x, y, upward| {
                intercept_pull(nested, interceptor, x, y, upward)
            });
            match verdict {
                Some(PullEvent::Pull {
                    delta_y,
                    current_translation_y,
                    upward_pull,
                    delta_upward_pull,
                    collapse_eligible,
                }) => {
                    self.on_pull(
                        delta_y,
                        current_translation_y,
                        upward_pull,
                        delta_upward_pull,
                        collapse_eligible,
                    );
                    intercepted = true;
                }
                Some(PullEvent::Release { collapse_eligible }) => {
                    self.on_release(collapse_eligible)?;
                    intercepted = true;
                }
                None => intercepted = self.pull.is_pulling(),
            }
        }

        Ok(if intercepted {
            TouchDispatch::Intercepted
        } else {
            TouchDispatch::Forwarded
        })
    }

    /// Decide whether a pull starting at `(down_x, down_y)` belongs to
    /// someone else. A pull that starts inside an open nested page is always
    /// intercepted.
    pub fn handle_pull_intercept(&self, down_x: f32, down_y: f32, upward: bool) -> InterceptResult {
        intercept_pull(
            self.nested.as_ref(),
            &*self.interceptor,
            down_x,
            down_y,
            upward,
        )
    }

    // --- Drawing ---

    pub fn should_draw(&self) -> bool {
        !self.state.is_collapsed()
    }

    pub fn should_draw_child(&self, kind: ChildKind) -> bool {
        self.draw_suppressor.should_draw_child(kind)
    }

    pub fn is_fully_covered_by_nested_page(&self) -> bool {
        self.draw_suppressor.is_fully_covered()
    }

    /// Drain redraw requests raised by the nested page.
    pub fn take_redraw_request(&self) -> bool {
        self.draw_suppressor.take_redraw_request()
    }

    // --- Frame loop ---

    /// Advance animations by `dt` and apply the results.
    ///
    /// # Errors
    ///
    /// [`PageError::Capability`] if lifting layout suppression at the end of
    /// a transition failed. Completion callbacks have already fired and
    /// queued requests wait for the next tick.
    pub fn tick(&mut self, dt: Duration) -> Result<FrameChanges> {
        let (state, visibility) = (self.state, self.visibility);
        let frame = self.animator.tick(dt);
        let mut changes = FrameChanges::empty();

        if let Some(alpha) = frame.alpha {
            self.alpha = alpha;
            changes |= FrameChanges::ALPHA;
        }
        if let Some(tx) = frame.translation_x {
            self.translation_x = tx;
            changes |= FrameChanges::TRANSLATION;
        }
        if let Some(ty) = frame.translation_y {
            self.translation_y = ty;
            changes |= FrameChanges::TRANSLATION;
        }
        if let Some(dims) = frame.dimensions {
            self.clipper.set_clipped_dimensions(dims.width, dims.height);
            changes |= FrameChanges::CLIP;
        }
        if frame.reset_clipping {
            self.clipper.reset_clipping();
        }
        if let Some((show, page_ty)) = frame.toolbar {
            if self.toolbar.update(show, page_ty) {
                changes |= FrameChanges::TOOLBAR;
            }
        }

        if let Some(kind) = frame.finished {
            self.finish_transition(kind)?;
        }
        self.apply_requests()?;

        if self.state != state {
            changes |= FrameChanges::STATE;
        }
        if self.visibility != visibility {
            changes |= FrameChanges::VISIBILITY;
        }
        Ok(changes)
    }

    // --- Accessors ---

    #[inline]
    pub fn state(&self) -> PageState {
        self.state
    }

    #[inline]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[inline]
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    #[inline]
    pub fn translation_x(&self) -> f32 {
        self.translation_x
    }

    #[inline]
    pub fn translation_y(&self) -> f32 {
        self.translation_y
    }

    pub fn layout_size(&self) -> Option<Size> {
        self.layout
    }

    pub fn clipped_dimensions(&self) -> Dimensions {
        self.clipper.dimensions()
    }

    pub fn is_clipped(&self) -> bool {
        self.clipper.is_clipped()
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_running()
    }

    /// Whether the toolbar is being animated independently of the page.
    pub fn is_toolbar_animating(&self) -> bool {
        self.animator.is_toolbar_running()
    }

    pub fn is_layout_suppressed(&self) -> bool {
        self.layout_suppressed
    }

    pub fn is_pull_in_progress(&self) -> bool {
        self.pull.is_pulling()
    }

    pub fn has_pending_immediate_expand(&self) -> bool {
        self.pending_immediate_expand
    }

    // --- Internals ---

    fn timing(&self, duration: Duration) -> Timing {
        Timing {
            duration,
            delay: self.config.start_delay,
            easing: self.config.easing.curve(),
        }
    }

    fn align_with_item(&mut self, item: &ExpandedItem) {
        let rect = item.location;
        self.clipper
            .set_clipped_dimensions(rect.width as f32, rect.height as f32);
        self.translation_x = rect.left() as f32;
        self.translation_y = rect.top() as f32;
    }

    fn complete_immediate_expand(&mut self) {
        self.align_to_cover();
        self.dispatch_about_to_expand(Duration::ZERO);
        self.dispatch_fully_expanded();
    }

    fn animate_toolbar(&mut self, show: bool, target_page_ty: f32) {
        if self.translation_y == target_page_ty {
            return;
        }
        let Some(toolbar) = self.toolbar.get() else {
            return;
        };
        // Start from the toolbar's edge when the page is tucked behind it.
        let from = toolbar.visible_bottom().max(self.translation_y);
        let mut duration = self.config.animation_duration;
        if show && (target_page_ty - from).abs() > self.clipper.dimensions().height * 0.4 {
            duration *= 2;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "toolbar.animate",
            show,
            from,
            to = target_page_ty,
            duration_ms = duration.as_millis() as u64
        );
        self.animator
            .start_toolbar(show, from, target_page_ty, self.timing(duration));
    }

    fn animate_dimensions(&mut self, target: Size) {
        let target = self.layout.map_or(target, |full| target.min(full));
        let reset_on_finish = self.layout == Some(target);
        self.animator.start_dimensions(
            self.clipper.dimensions(),
            target.into(),
            reset_on_finish,
            self.timing(self.config.animation_duration),
        );
    }

    fn acquire_layout_suppression(&mut self) -> Result<()> {
        if !self.layout_suppressed {
            self.layout_suppressed = self.capability.set_suppressed(true)?;
        }
        Ok(())
    }

    fn release_layout_suppression(&mut self) -> Result<()> {
        if std::mem::take(&mut self.layout_suppressed) {
            self.capability.set_suppressed(false)?;
        }
        Ok(())
    }

    fn finish_transition(&mut self, kind: TransitionKind) -> Result<()> {
        match kind {
            TransitionKind::Expand => {
                let released = self.release_layout_suppression();
                self.dispatch_fully_expanded();
                released
            }
            TransitionKind::Collapse => {
                let released = self.release_layout_suppression();
                self.visibility = Visibility::Invisible;
                self.dispatch_collapsed();
                released
            }
            TransitionKind::Restore => {
                self.dispatch(PageEvent::FullyCovered);
                Ok(())
            }
        }
    }

    fn set_state(&mut self, next: PageState) {
        #[cfg(feature = "tracing")]
        Self::log_state_change(self.state, next);
        self.state = next;
    }

    #[cfg(feature = "tracing")]
    fn log_state_change(from: PageState, to: PageState) {
        if from != to {
            tracing::debug!(message = "page.state", from = ?from, to = ?to);
        }
    }

    fn dispatch(&mut self, event: PageEvent) {
        self.dispatcher.dispatch(&event, self.state);
    }

    fn dispatch_about_to_expand(&mut self, duration: Duration) {
        self.dispatch(PageEvent::AboutToExpand { duration });
        self.set_state(PageState::Expanding);
    }

    fn dispatch_fully_expanded(&mut self) {
        self.set_state(PageState::Expanded);
        self.dispatch(PageEvent::FullyCovered);
        self.dispatch(PageEvent::Expanded);
    }

    fn dispatch_about_to_collapse(&mut self, duration: Duration) {
        self.dispatch(PageEvent::AboutToCollapse { duration });
        self.set_state(PageState::Collapsing);
    }

    fn dispatch_collapsed(&mut self) {
        self.set_state(PageState::Collapsed);
        self.dispatch(PageEvent::Collapsed);
    }
}

fn intercept_pull(
    nested: Option<&Rc<RefCell<ExpandablePage>>>,
    interceptor: &PullInterceptor,
    down_x: f32,
    down_y: f32,
    upward: bool,
) -> InterceptResult {
    if let Some(Ok(nested)) = nested.map(|page| page.try_borrow()) {
        let (local_x, local_y) = (down_x - nested.translation_x, down_y - nested.translation_y);
        if nested.state.is_expanded_or_expanding() && nested.clipper.contains(local_x, local_y) {
            // The nested page owns gestures that start on it.
            nested.handle_pull_intercept(down_x, down_y, upward);
            return InterceptResult::Intercepted;
        }
    }
    interceptor(down_x, down_y, upward)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    fn laid_out() -> ExpandablePage {
        let mut page = ExpandablePage::new(PageConfig::new().easing(crate::PageEasing::Linear));
        page.set_layout_size(Size::new(400, 800));
        page
    }

    fn settle(page: &mut ExpandablePage) {
        for _ in 0..100 {
            page.tick(FRAME).expect("tick");
            if !page.is_animating() {
                return;
            }
        }
        panic!("page never settled: {page:?}");
    }

    #[test]
    fn starts_collapsed_and_hidden() {
        let page = ExpandablePage::default();
        assert_eq!(page.state(), PageState::Collapsed);
        assert_eq!(page.visibility(), Visibility::Invisible);
        assert_eq!(page.alpha(), EXPANDED_ALPHA);
        assert!(!page.should_draw());
    }

    #[test]
    fn expand_requires_layout() {
        let mut page = ExpandablePage::default();
        let item = ExpandedItem::at(0, 200, 300, 80);
        assert_eq!(page.expand(&item), Err(PageError::LayoutUnknown));
        assert_eq!(page.state(), PageState::Collapsed);
        assert_eq!(page.translation_y(), 0.0);
    }

    #[test]
    fn gone_page_may_expand_without_layout() {
        let mut page = ExpandablePage::default();
        page.set_visibility(Visibility::Gone);
        page.expand(&ExpandedItem::at(0, 10, 10, 10)).expect("expand");
        assert_eq!(page.state(), PageState::Expanding);
    }

    #[test]
    fn expand_aligns_then_animates() {
        let mut page = laid_out();
        page.expand(&ExpandedItem::at(12, 200, 300, 80)).expect("expand");
        assert_eq!(page.state(), PageState::Expanding);
        assert_eq!(page.visibility(), Visibility::Visible);
        assert_eq!(page.alpha(), 0.0);
        assert_eq!(page.translation_y(), 200.0);
        assert_eq!(page.translation_x(), 12.0);
        assert_eq!(page.clipped_dimensions(), Dimensions::new(300.0, 80.0));
        assert!(page.should_draw());

        settle(&mut page);
        assert_eq!(page.state(), PageState::Expanded);
        assert_eq!(page.translation_x(), 0.0);
        assert!(!page.is_clipped());
    }

    #[test]
    fn tick_reports_changes() {
        let mut page = laid_out();
        assert!(page.tick(FRAME).expect("tick").is_empty());
        page.expand(&ExpandedItem::at(0, 200, 300, 80)).expect("expand");
        let changes = page.tick(FRAME).expect("tick");
        assert!(changes.contains(FrameChanges::ALPHA | FrameChanges::TRANSLATION | FrameChanges::CLIP));
        assert!(!changes.contains(FrameChanges::STATE));
    }

    #[test]
    fn collapse_hides_on_completion() {
        let mut page = laid_out();
        let item = ExpandedItem::at(0, 200, 300, 80);
        page.expand(&item).expect("expand");
        settle(&mut page);
        page.collapse(&item).expect("collapse");
        assert_eq!(page.state(), PageState::Collapsing);
        assert_eq!(page.alpha(), EXPANDED_ALPHA);
        settle(&mut page);
        assert_eq!(page.state(), PageState::Collapsed);
        assert_eq!(page.visibility(), Visibility::Invisible);
        assert!(!page.should_draw());
    }

    #[test]
    fn zero_width_item_collapses_at_full_width() {
        let mut page = laid_out();
        page.expand_immediately().expect("expand");
        page.collapse(&ExpandedItem::at(0, 300, 0, 50)).expect("collapse");
        settle(&mut page);
        assert_eq!(page.clipped_dimensions(), Dimensions::new(400.0, 50.0));
    }

    #[test]
    fn touches_forward_only_when_expanded() {
        let mut page = laid_out();
        page.set_pull_to_collapse_enabled(false);
        let tap = TouchEvent::Down { x: 5.0, y: 5.0 };
        assert_eq!(page.handle_touch(tap), Ok(TouchDispatch::Swallowed));
        page.expand(&ExpandedItem::at(0, 200, 300, 80)).expect("expand");
        assert_eq!(page.handle_touch(tap), Ok(TouchDispatch::Swallowed));
        settle(&mut page);
        assert_eq!(page.handle_touch(tap), Ok(TouchDispatch::Forwarded));
    }

    #[test]
    fn pull_claims_touches() {
        let mut page = laid_out();
        page.expand_immediately().expect("expand");
        assert_eq!(
            page.handle_touch(TouchEvent::Down { x: 0.0, y: 100.0 }),
            Ok(TouchDispatch::Forwarded)
        );
        assert_eq!(
            page.handle_touch(TouchEvent::Move { x: 0.0, y: 130.0 }),
            Ok(TouchDispatch::Intercepted)
        );
        assert_eq!(page.translation_y(), 30.0);
        assert!(page.is_pull_in_progress());
        assert_eq!(
            page.handle_touch(TouchEvent::Up { x: 0.0, y: 130.0 }),
            Ok(TouchDispatch::Intercepted)
        );
        assert!(!page.is_pull_in_progress());
    }

    #[test]
    fn hiding_drops_gesture() {
        let mut page = laid_out();
        page.expand_immediately().expect("expand");
        page.handle_touch(TouchEvent::Down { x: 0.0, y: 0.0 }).expect("down");
        page.handle_touch(TouchEvent::Move { x: 0.0, y: 40.0 }).expect("move");
        page.set_visibility(Visibility::Invisible);
        assert!(!page.is_pull_in_progress());
    }

    #[test]
    fn pull_threshold_updates_tracker() {
        let mut page = laid_out();
        page.set_pull_threshold(120.0);
        assert_eq!(page.config().pull.collapse_threshold, 120.0);
    }

    #[cfg(feature = "tracing")]
    mod tracing_capture {
        use super::*;
        use std::sync::{Arc, Mutex};
        use tracing::Subscriber;
        use tracing_subscriber::Layer;
        use tracing_subscriber::layer::{Context, SubscriberExt};

        struct MessageCapture {
            messages: Arc<Mutex<Vec<String>>>,
        }

        impl<S: Subscriber> Layer<S> for MessageCapture {
            fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
                struct Msg(Option<String>);
                impl tracing::field::Visit for Msg {
                    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
                        if field.name() == "message" {
                            self.0 = Some(value.to_string());
                        }
                    }

                    fn record_debug(
                        &mut self,
                        field: &tracing::field::Field,
                        value: &dyn std::fmt::Debug,
                    ) {
                        if field.name() == "message" {
                            self.0 = Some(format!("{value:?}").trim_matches('"').to_string());
                        }
                    }
                }
                let mut msg = Msg(None);
                event.record(&mut msg);
                if let Some(message) = msg.0 {
                    self.messages.lock().expect("capture lock").push(message);
                }
            }
        }

        #[test]
        fn lifecycle_events_are_logged() {
            let messages = Arc::new(Mutex::new(Vec::new()));
            let subscriber = tracing_subscriber::registry().with(MessageCapture {
                messages: Arc::clone(&messages),
            });
            let _guard = tracing::subscriber::set_default(subscriber);

            let toolbar = Rc::new(RefCell::new(Toolbar::new(56.0)));
            let mut page = laid_out();
            page.set_toolbar(Some(&toolbar));
            let item = ExpandedItem::at(0, 200, 300, 80);
            page.expand(&item).expect("expand");
            settle(&mut page);
            page.on_release(false).expect("release");
            page.collapse(&item).expect("collapse");

            let seen = messages.lock().expect("capture lock");
            for expected in [
                "page.expand",
                "page.state",
                "toolbar.animate",
                "page.release",
                "page.collapse",
            ] {
                assert!(seen.iter().any(|m| m == expected), "missing {expected}: {seen:?}");
            }
        }
    }
}
