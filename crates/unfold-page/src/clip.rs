#![forbid(unsafe_code)]

//! Geometry clipping: the rendered extent of the page, which may be smaller
//! than its laid-out size while it sits over an item's footprint.

use unfold_core::geometry::Size;

/// Rendered width and height.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
}

impl Dimensions {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether a page-local point lies inside `[0, width) x [0, height)`.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= 0.0 && y >= 0.0 && x < self.width && y < self.height
    }
}

impl From<Size> for Dimensions {
    fn from(size: Size) -> Self {
        Self::new(size.width as f32, size.height as f32)
    }
}

/// Tracks the clipped extent against the full laid-out size.
#[derive(Debug, Clone, Default)]
pub struct GeometryClipper {
    full: Size,
    clip: Option<Dimensions>,
}

impl GeometryClipper {
    pub fn new(full: Size) -> Self {
        Self { full, clip: None }
    }

    /// Update the laid-out size. An active clip is kept as is.
    pub fn set_full_size(&mut self, full: Size) {
        self.full = full;
    }

    pub fn full_size(&self) -> Size {
        self.full
    }

    /// Constrain the rendered extent to exactly `width` x `height`.
    ///
    /// Negative inputs are treated as zero.
    pub fn set_clipped_dimensions(&mut self, width: f32, height: f32) {
        self.clip = Some(Dimensions::new(width.max(0.0), height.max(0.0)));
    }

    /// Restore the full laid-out extent.
    pub fn reset_clipping(&mut self) {
        self.clip = None;
    }

    #[inline]
    pub fn is_clipped(&self) -> bool {
        self.clip.is_some()
    }

    /// The effective rendered extent.
    pub fn dimensions(&self) -> Dimensions {
        self.clip.unwrap_or_else(|| self.full.into())
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.dimensions().contains(x, y)
    }
}
