#![forbid(unsafe_code)]

//! Expandable page: a panel that morphs out of a list item and back.
//!
//! # Role in Unfold
//! `unfold-page` is the widget layer. It composes the primitives from
//! `unfold-core` (tweens, the pull tracker, the layout capability) into a
//! single [`ExpandablePage`] with a lifecycle state machine.
//!
//! # Primary responsibilities
//! - **State machine**: [`PageState`] transitions driven by expand, collapse,
//!   and pull release.
//! - **Orchestration**: [`animator::PageAnimator`] runs the page transition,
//!   the clipped-size animation, and the toolbar ramp side by side.
//! - **Dispatch**: [`PageEvent`]s fan out to a nested-page listener, the
//!   container, subscribers, and [`PageHooks`] in a fixed order.
//! - **Requests**: [`PageRequests`] lets listeners ask for an expand or
//!   collapse while the page is busy dispatching to them.
//! - **Nesting**: [`nested::DrawSuppressor`] lets a covered parent skip
//!   drawing children hidden behind an open nested page.
//!
//! # How it fits in the system
//! The host owns the frame loop. It forwards touches to
//! [`ExpandablePage::handle_touch`], calls [`ExpandablePage::tick`] once per
//! frame, and renders the page's presentation properties.
//!
//! ```
//! use std::time::Duration;
//! use unfold_core::geometry::Size;
//! use unfold_page::{ExpandablePage, ExpandedItem, PageConfig, PageState};
//!
//! let mut page = ExpandablePage::new(PageConfig::default());
//! page.set_layout_size(Size::new(400, 800));
//! page.expand(&ExpandedItem::at(0, 200, 300, 80)).unwrap();
//! while page.is_animating() {
//!     page.tick(Duration::from_millis(16)).unwrap();
//! }
//! assert_eq!(page.state(), PageState::Expanded);
//! ```

pub mod animator;
pub mod clip;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod nested;
pub mod page;
pub mod request;
pub mod state;
pub mod toolbar;

pub use animator::FrameChanges;
pub use clip::Dimensions;
pub use config::{EXPANDED_ALPHA, PageConfig, PageEasing};
pub use dispatch::{NoHooks, PageEvent, PageHooks, PageListener, Subscription};
pub use error::{PageError, Result};
pub use nested::ChildKind;
pub use page::{ExpandablePage, ExpandedItem, TouchDispatch};
pub use request::{PageRequest, PageRequests};
pub use state::{PageState, Visibility};
pub use toolbar::Toolbar;
