#![forbid(unsafe_code)]

//! Bulk-layout suppression capability, probed once and cached.
//!
//! Some hosts can pause layout passes for a subtree while a large transition
//! runs. Whether the host supports it is discovered by a probe that may be
//! slow, so [`LayoutCapability::warm_up`] resolves it on a background thread
//! ahead of first use.
//!
//! # Contract
//!
//! - **One probe**: the probe runs at most once per capability instance
//!   (clones share the cache).
//! - **Never blocks the caller while warming**: if a warm-up is still in
//!   flight at the point of use, the capability is treated as unavailable
//!   for that call.
//! - **Failures surface at use**: a probe error is cached and returned from
//!   every subsequent [`LayoutCapability::set_suppressed`] call. It is never
//!   swallowed. A probe that panics during warm-up is cached as a
//!   [`ProbeError`] too, and the in-flight flag is cleared either way.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use unfold_core::capability::{BulkLayout, LayoutCapability, LayoutSuppression};
//!
//! struct Host;
//! impl LayoutSuppression for Host {
//!     fn set_layout_suppressed(&self, _suppressed: bool) {}
//! }
//!
//! let cap = LayoutCapability::new(|| Ok(BulkLayout::Supported(Arc::new(Host))));
//! assert_eq!(cap.set_suppressed(true), Ok(true));
//! ```

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread::JoinHandle;

use thiserror::Error;

#[cfg(feature = "tracing")]
use crate::logging::{debug, warn};

/// Host hook for pausing layout passes.
pub trait LayoutSuppression: Send + Sync {
    fn set_layout_suppressed(&self, suppressed: bool);
}

/// Outcome of a successful probe.
#[derive(Clone)]
pub enum BulkLayout {
    /// The host cannot suppress layout; calls are skipped.
    Unsupported,
    /// The host can suppress layout through this hook.
    Supported(Arc<dyn LayoutSuppression>),
}

impl fmt::Debug for BulkLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported => f.write_str("Unsupported"),
            Self::Supported(_) => f.write_str("Supported"),
        }
    }
}

/// A probe that failed in an unexpected environment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("layout capability probe failed: {reason}")]
pub struct ProbeError {
    pub reason: String,
}

impl ProbeError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

type ProbeFn = dyn Fn() -> Result<BulkLayout, ProbeError> + Send + Sync;

struct Shared {
    probe: Box<ProbeFn>,
    cache: OnceLock<Result<BulkLayout, ProbeError>>,
    warming: AtomicBool,
}

impl Shared {
    fn resolve(&self) -> &Result<BulkLayout, ProbeError> {
        self.cache.get_or_init(|| {
            #[cfg(feature = "tracing")]
            let start = web_time::Instant::now();
            let result = (self.probe)();
            #[cfg(feature = "tracing")]
            log_probe(&result, start);
            result
        })
    }
}

#[cfg(feature = "tracing")]
fn log_probe(result: &Result<BulkLayout, ProbeError>, start: web_time::Instant) {
    let elapsed_us = start.elapsed().as_micros() as u64;
    match result {
        Ok(layout) => debug!(
            message = "capability.probe",
            supported = matches!(layout, BulkLayout::Supported(_)),
            elapsed_us
        ),
        Err(err) => warn!(message = "capability.probe", error = %err, elapsed_us),
    }
}

/// Lazily probed bulk-layout capability. Cheap to clone.
#[derive(Clone)]
pub struct LayoutCapability {
    shared: Arc<Shared>,
}

impl fmt::Debug for LayoutCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutCapability")
            .field("resolved", &self.shared.cache.get())
            .field("warming", &self.shared.warming.load(Ordering::Acquire))
            .finish()
    }
}

impl Default for LayoutCapability {
    fn default() -> Self {
        Self::unsupported()
    }
}

impl LayoutCapability {
    /// Wrap a probe. Nothing runs until [`warm_up`](Self::warm_up) or first use.
    pub fn new<F>(probe: F) -> Self
    where
        F: Fn() -> Result<BulkLayout, ProbeError> + Send + Sync + 'static,
    {
        Self {
            shared: Arc::new(Shared {
                probe: Box::new(probe),
                cache: OnceLock::new(),
                warming: AtomicBool::new(false),
            }),
        }
    }

    /// A capability that is known to be absent.
    pub fn unsupported() -> Self {
        let cap = Self::new(|| Ok(BulkLayout::Unsupported));
        let _ = cap.shared.cache.set(Ok(BulkLayout::Unsupported));
        cap
    }

    /// Whether the probe has finished (successfully or not).
    pub fn is_resolved(&self) -> bool {
        self.shared.cache.get().is_some()
    }

    /// Resolve the probe on a background thread.
    ///
    /// Returns `None` when the result is already cached or another warm-up
    /// is running.
    pub fn warm_up(&self) -> Option<JoinHandle<()>> {
        if self.is_resolved() || self.shared.warming.swap(true, Ordering::AcqRel) {
            return None;
        }
        let shared = Arc::clone(&self.shared);
        Some(std::thread::spawn(move || {
            if panic::catch_unwind(AssertUnwindSafe(|| shared.resolve())).is_err() {
                let _ = shared
                    .cache
                    .set(Err(ProbeError::new("probe panicked during warm-up")));
            }
            shared.warming.store(false, Ordering::Release);
        }))
    }

    /// Apply or lift layout suppression.
    ///
    /// Returns `Ok(true)` when the host hook was invoked, `Ok(false)` when the
    /// capability is unsupported or still warming.
    pub fn set_suppressed(&self, suppressed: bool) -> Result<bool, ProbeError> {
        let resolved = match self.shared.cache.get() {
            Some(resolved) => resolved,
            None if self.shared.warming.load(Ordering::Acquire) => return Ok(false),
            None => self.shared.resolve(),
        };
        match resolved {
            Ok(BulkLayout::Supported(hook)) => {
                hook.set_layout_suppressed(suppressed);
                Ok(true)
            }
            Ok(BulkLayout::Unsupported) => Ok(false),
            Err(err) => Err(err.clone()),
        }
    }
}
