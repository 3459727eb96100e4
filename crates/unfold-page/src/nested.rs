#![forbid(unsafe_code)]

//! Draw suppression for a page covered by a nested page.
//!
//! When a nested page fully covers its parent, the parent's other children
//! are invisible anyway; skipping them avoids compositing two full layers.
//! The parent installs a [`DrawSuppressor`] as the nested page's listener and
//! consults it when drawing children.

use std::cell::Cell;

use crate::dispatch::{PageEvent, PageListener};
use crate::state::PageState;

/// What kind of child the host is about to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildKind {
    /// Another expandable page.
    NestedPage,
    Other,
}

/// Tracks whether a nested page covers its parent and counts the redraws
/// the parent owes the host.
#[derive(Debug, Default)]
pub struct DrawSuppressor {
    fully_covered: Cell<bool>,
    pending_redraws: Cell<u32>,
}

impl DrawSuppressor {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_fully_covered(&self) -> bool {
        self.fully_covered.get()
    }

    /// While covered only nested pages are drawn.
    pub fn should_draw_child(&self, kind: ChildKind) -> bool {
        !self.fully_covered.get() || kind == ChildKind::NestedPage
    }

    /// Redraw requests raised since the last [`take_redraw_request`](Self::take_redraw_request).
    pub fn pending_redraws(&self) -> u32 {
        self.pending_redraws.get()
    }

    /// Drain pending redraw requests. Returns whether there were any.
    pub fn take_redraw_request(&self) -> bool {
        self.pending_redraws.replace(0) > 0
    }

    fn set_fully_covered(&self, covered: bool) {
        if self.fully_covered.replace(covered) != covered {
            self.pending_redraws
                .set(self.pending_redraws.get().saturating_add(1));
        }
    }
}

impl PageListener for DrawSuppressor {
    fn on_page_event(&self, event: &PageEvent, _state: PageState) {
        match event {
            PageEvent::AboutToCollapse { .. }
            | PageEvent::Pull { .. }
            | PageEvent::Release {
                collapse_eligible: true,
            } => self.set_fully_covered(false),
            PageEvent::FullyCovered => self.set_fully_covered(true),
            PageEvent::AboutToExpand { .. }
            | PageEvent::Expanded
            | PageEvent::Collapsed
            | PageEvent::Release {
                collapse_eligible: false,
            } => {}
        }
    }
}
