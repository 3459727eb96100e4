#![forbid(unsafe_code)]

//! Core: geometry, animation primitives, pull gestures, and capability probing.
//!
//! # Role in Unfold
//! `unfold-core` is the leaf layer. It owns the small value types and the
//! frame-driven primitives that the page crate composes into expand/collapse
//! transitions.
//!
//! # Primary responsibilities
//! - **Rect / Size**: integer geometry for item bounds and page extents.
//! - **Animation**: the [`animation::Animation`] trait, easing curves, and
//!   [`animation::Tween`] for scalar properties.
//! - **Pull tracking**: [`pull::PullTracker`] classifies touch samples into
//!   pull/release verdicts for pull-to-collapse.
//! - **Capability probing**: [`capability::LayoutCapability`] resolves the
//!   optional bulk-layout suppression capability once, off-thread.
//!
//! # How it fits in the system
//! `unfold-page` consumes these types and drives them from the host's frame
//! loop. Nothing here touches a renderer, so every primitive is testable
//! without one.

pub mod animation;
pub mod capability;
pub mod geometry;
pub mod logging;
pub mod pull;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, error, info, trace, warn};
