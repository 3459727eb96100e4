#![forbid(unsafe_code)]

//! Lifecycle event dispatch.
//!
//! Every event goes to four tiers, always in this order:
//!
//! 1. the nested-page listener (installed by a parent page),
//! 2. the container listener,
//! 3. subscribers, newest first,
//! 4. the page's [`PageHooks`].
//!
//! Subscribers are snapshotted before the round starts. A subscriber that
//! unsubscribes itself (or anyone else) mid-round does not disturb the
//! iteration: everyone in the snapshot is notified exactly once.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::state::PageState;

/// A page lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageEvent {
    /// The page is about to animate open over `duration`.
    AboutToExpand { duration: Duration },
    /// The expand animation finished.
    Expanded,
    /// The page visually fills the whole surface.
    FullyCovered,
    /// The page is about to animate shut over `duration`.
    AboutToCollapse { duration: Duration },
    /// The collapse animation finished and the page is hidden.
    Collapsed,
    /// The page was dragged.
    Pull {
        /// Raw finger movement since the previous sample.
        delta_y: f32,
        /// Translation the page moved to.
        current_translation_y: f32,
        /// Whether the gesture as a whole is heading upward.
        upward_pull: bool,
        /// Whether this particular delta is upward.
        delta_upward_pull: bool,
        /// Whether releasing now would collapse the page.
        collapse_eligible: bool,
    },
    /// The drag ended.
    Release { collapse_eligible: bool },
}

impl PageEvent {
    /// Stable name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AboutToExpand { .. } => "about_to_expand",
            Self::Expanded => "expanded",
            Self::FullyCovered => "fully_covered",
            Self::AboutToCollapse { .. } => "about_to_collapse",
            Self::Collapsed => "collapsed",
            Self::Pull { .. } => "pull",
            Self::Release { .. } => "release",
        }
    }
}

/// Receives page events together with the page state at dispatch time.
pub trait PageListener {
    fn on_page_event(&self, event: &PageEvent, state: PageState);
}

impl<F> PageListener for F
where
    F: Fn(&PageEvent, PageState),
{
    fn on_page_event(&self, event: &PageEvent, state: PageState) {
        self(event, state)
    }
}

/// Extension points called last for the four lifecycle events.
pub trait PageHooks {
    fn on_page_about_to_expand(&mut self, _duration: Duration) {}

    fn on_page_expanded(&mut self) {}

    fn on_page_about_to_collapse(&mut self, _duration: Duration) {}

    /// The page is fully invisible when this runs.
    fn on_page_collapsed(&mut self) {}
}

/// Hooks that do nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl PageHooks for NoHooks {}

type SubscriberList = RefCell<Vec<(u64, Rc<dyn PageListener>)>>;

/// Handle returned by [`Dispatcher::subscribe`].
///
/// Dropping the handle keeps the subscriber registered; call
/// [`unsubscribe`](Self::unsubscribe) to remove it.
#[derive(Clone)]
pub struct Subscription {
    id: u64,
    list: Weak<SubscriberList>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

impl Subscription {
    /// Remove the subscriber. Returns `false` if it was already gone.
    pub fn unsubscribe(&self) -> bool {
        let Some(list) = self.list.upgrade() else {
            return false;
        };
        let mut list = list.borrow_mut();
        let before = list.len();
        list.retain(|(id, _)| *id != self.id);
        list.len() != before
    }

    pub fn is_active(&self) -> bool {
        self.list
            .upgrade()
            .is_some_and(|list| list.borrow().iter().any(|(id, _)| *id == self.id))
    }
}

/// Ordered fan-out of [`PageEvent`]s.
pub struct Dispatcher {
    nested: Option<Rc<dyn PageListener>>,
    container: Option<Rc<dyn PageListener>>,
    subscribers: Rc<SubscriberList>,
    next_id: u64,
    hooks: Box<dyn PageHooks>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("nested", &self.nested.is_some())
            .field("container", &self.container.is_some())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            nested: None,
            container: None,
            subscribers: Rc::new(RefCell::new(Vec::with_capacity(4))),
            next_id: 0,
            hooks: Box::new(NoHooks),
        }
    }

    pub fn set_nested_listener(&mut self, listener: Option<Rc<dyn PageListener>>) {
        self.nested = listener;
    }

    pub fn has_nested_listener(&self) -> bool {
        self.nested.is_some()
    }

    pub fn set_container_listener(&mut self, listener: Option<Rc<dyn PageListener>>) {
        self.container = listener;
    }

    pub fn set_hooks(&mut self, hooks: Box<dyn PageHooks>) {
        self.hooks = hooks;
    }

    pub fn subscribe(&mut self, listener: Rc<dyn PageListener>) -> Subscription {
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.borrow_mut().push((id, listener));
        Subscription {
            id,
            list: Rc::downgrade(&self.subscribers),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Deliver `event` to every tier.
    pub fn dispatch(&mut self, event: &PageEvent, state: PageState) {
        if let Some(nested) = &self.nested {
            nested.on_page_event(event, state);
        }
        if let Some(container) = &self.container {
            container.on_page_event(event, state);
        }

        let snapshot: Vec<Rc<dyn PageListener>> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in snapshot.iter().rev() {
            listener.on_page_event(event, state);
        }

        match *event {
            PageEvent::AboutToExpand { duration } => self.hooks.on_page_about_to_expand(duration),
            PageEvent::Expanded => self.hooks.on_page_expanded(),
            PageEvent::AboutToCollapse { duration } => {
                self.hooks.on_page_about_to_collapse(duration)
            }
            PageEvent::Collapsed => self.hooks.on_page_collapsed(),
            PageEvent::FullyCovered | PageEvent::Pull { .. } | PageEvent::Release { .. } => {}
        }
    }
}
