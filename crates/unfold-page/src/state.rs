#![forbid(unsafe_code)]

//! Page lifecycle state.
//!
//! State machine: Collapsed → Expanding → Expanded → Collapsing → Collapsed
//!
//! An interrupted transition can jump across (Expanding → Collapsing or
//! Collapsing → Expanding); the most recent request wins.

/// What the page is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageState {
    /// Hidden; nothing is drawn and touches are swallowed.
    #[default]
    Collapsed,
    /// Animating back into the origin item.
    Collapsing,
    /// Animating out of the origin item.
    Expanding,
    /// Resting over the whole surface; the only state that forwards touches.
    Expanded,
}

impl PageState {
    #[inline]
    pub fn is_expanded(self) -> bool {
        matches!(self, Self::Expanded)
    }

    #[inline]
    pub fn is_expanding(self) -> bool {
        matches!(self, Self::Expanding)
    }

    #[inline]
    pub fn is_collapsed(self) -> bool {
        matches!(self, Self::Collapsed)
    }

    #[inline]
    pub fn is_collapsing(self) -> bool {
        matches!(self, Self::Collapsing)
    }

    #[inline]
    pub fn is_expanded_or_expanding(self) -> bool {
        matches!(self, Self::Expanded | Self::Expanding)
    }

    #[inline]
    pub fn is_collapsed_or_collapsing(self) -> bool {
        matches!(self, Self::Collapsed | Self::Collapsing)
    }

    #[inline]
    pub fn is_expanding_or_collapsing(self) -> bool {
        matches!(self, Self::Expanding | Self::Collapsing)
    }
}

/// Host-facing visibility of the page surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    Visible,
    /// Laid out but not shown. The resting state of a collapsed page.
    #[default]
    Invisible,
    /// Excluded from layout entirely; the page may never receive a size.
    Gone,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_collapsed() {
        assert_eq!(PageState::default(), PageState::Collapsed);
        assert_eq!(Visibility::default(), Visibility::Invisible);
    }

    #[test]
    fn predicates_partition_states() {
        use PageState::*;
        for s in [Collapsed, Collapsing, Expanding, Expanded] {
            assert_ne!(s.is_expanded_or_expanding(), s.is_collapsed_or_collapsing());
        }
        assert!(Expanding.is_expanding_or_collapsing());
        assert!(Collapsing.is_expanding_or_collapsing());
        assert!(!Expanded.is_expanding_or_collapsing());
        assert!(!Collapsed.is_expanding_or_collapsing());
    }

    #[test]
    fn single_state_predicates() {
        assert!(PageState::Expanded.is_expanded());
        assert!(PageState::Expanding.is_expanding());
        assert!(PageState::Collapsed.is_collapsed());
        assert!(PageState::Collapsing.is_collapsing());
        assert!(!PageState::Expanding.is_expanded());
    }
}
