#![forbid(unsafe_code)]

//! Logging facade.
//!
//! With the `tracing` feature the usual `tracing` macros are re-exported from
//! here. Without it, the same names expand to nothing so call sites never need
//! their own `#[cfg]` guards.

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, error, info, trace, warn};

#[cfg(not(feature = "tracing"))]
#[macro_export]
#[doc(hidden)]
macro_rules! __unfold_log_noop {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "tracing"))]
pub use crate::__unfold_log_noop as debug;
#[cfg(not(feature = "tracing"))]
pub use crate::__unfold_log_noop as error;
#[cfg(not(feature = "tracing"))]
pub use crate::__unfold_log_noop as info;
#[cfg(not(feature = "tracing"))]
pub use crate::__unfold_log_noop as trace;
#[cfg(not(feature = "tracing"))]
pub use crate::__unfold_log_noop as warn;

/// Install a JSON `tracing` subscriber filtered by `RUST_LOG`.
///
/// Returns `false` if a global subscriber was already set.
#[cfg(feature = "tracing-json")]
pub fn init_json_subscriber() -> bool {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
        .is_ok()
}
