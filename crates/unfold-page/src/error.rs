#![forbid(unsafe_code)]

use thiserror::Error;
use unfold_core::capability::ProbeError;

pub type Result<T> = std::result::Result<T, PageError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    /// `expand` was called before the host reported the page's laid-out size.
    #[error("page size is unknown: lay the page out before expanding it")]
    LayoutUnknown,

    #[error(transparent)]
    Capability(#[from] ProbeError),
}
