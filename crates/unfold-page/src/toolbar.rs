#![forbid(unsafe_code)]

//! Toolbar synchronization.
//!
//! The toolbar sits at the top of the surface and is owned by the host. The
//! page holds a weak link to it and pushes it up while expanding, pulls it
//! back down while collapsing, and keeps it glued to the page's top edge
//! during a pull.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use unfold_core::logging::warn;

/// Host-owned toolbar state the page reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Toolbar {
    /// Bottom edge in surface coordinates. Also the toolbar's height.
    pub bottom: f32,
    /// Vertical offset written by the page. `0.0` is fully shown and
    /// `-bottom` fully hidden.
    pub translation_y: f32,
}

impl Toolbar {
    pub fn new(bottom: f32) -> Self {
        Self {
            bottom,
            translation_y: 0.0,
        }
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom.max(0.0)
    }

    /// Where the toolbar's bottom edge is currently drawn.
    #[inline]
    pub fn visible_bottom(&self) -> f32 {
        self.bottom + self.translation_y
    }

    #[inline]
    pub fn is_fully_hidden(&self) -> bool {
        self.translation_y <= -self.height()
    }
}

/// Toolbar offset for a page at `page_translation_y`, or `None` when the
/// toolbar should be left alone.
///
/// Any returned value lies in `[-height, 0]`.
pub fn toolbar_offset(show: bool, page_translation_y: f32, height: f32, current: f32) -> Option<f32> {
    let height = height.max(0.0);
    let target = page_translation_y - height;
    if !show && (page_translation_y >= height || current <= -height) {
        return None;
    }
    Some(target.clamp(-height, 0.0))
}

/// Weak link from a page to its toolbar.
#[derive(Debug, Default)]
pub struct ToolbarSync {
    link: Option<Weak<RefCell<Toolbar>>>,
}

impl ToolbarSync {
    pub fn attach(&mut self, toolbar: &Rc<RefCell<Toolbar>>) {
        self.link = Some(Rc::downgrade(toolbar));
    }

    pub fn detach(&mut self) {
        self.link = None;
    }

    /// The toolbar, if one is linked and still alive.
    pub fn toolbar(&self) -> Option<Rc<RefCell<Toolbar>>> {
        self.link.as_ref().and_then(Weak::upgrade)
    }

    pub fn is_attached(&self) -> bool {
        self.toolbar().is_some()
    }

    /// Snapshot of the toolbar state.
    pub fn get(&self) -> Option<Toolbar> {
        let toolbar = self.toolbar()?;
        let state = toolbar.try_borrow().ok()?;
        Some(*state)
    }

    pub fn bottom(&self) -> Option<f32> {
        self.get().map(|tb| tb.bottom)
    }

    /// Move the toolbar to follow a page at `page_translation_y`.
    ///
    /// Returns `true` when the toolbar offset was written.
    pub fn update(&self, show: bool, page_translation_y: f32) -> bool {
        let Some(toolbar) = self.toolbar() else {
            return false;
        };
        let Ok(mut toolbar) = toolbar.try_borrow_mut() else {
            warn!(message = "toolbar.update", skipped = "toolbar borrowed by host");
            return false;
        };
        match toolbar_offset(show, page_translation_y, toolbar.height(), toolbar.translation_y) {
            Some(offset) => {
                toolbar.translation_y = offset;
                true
            }
            None => false,
        }
    }
}
