use crate::core::fit::Rect;
use crate::core::pixels::PixelBuffer;
use crate::error::ViewerError;

/// Current client-area size in physical pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Minimized windows report a zero-area client rect
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// What happened to a frame handed to [`RenderTarget::present`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentOutcome {
    /// Frame reached the screen
    Presented,
    /// Nothing to draw into (zero-area viewport)
    Skipped,
    /// Transient surface condition; draw again on the next redraw
    Retry,
    /// The rendering context is gone and must be rebuilt with all its bitmaps
    TargetLost,
}

/// Rendering context that owns its bitmaps
///
/// A bitmap created by a target is only valid while that target lives.
pub trait RenderTarget {
    type Bitmap;

    /// Track a new viewport size
    fn resize(&mut self, viewport: Viewport);

    /// Upload pixels as a native bitmap. Any error here lets the caller try
    /// another pixel format.
    fn create_bitmap(&mut self, pixels: &PixelBuffer) -> Result<Self::Bitmap, ViewerError>;

    /// Clear to black and draw `bitmap` into `dst`, if any
    fn present(
        &mut self,
        frame: Option<(&Self::Bitmap, Rect)>,
    ) -> Result<PresentOutcome, ViewerError>;
}

/// Builds render targets on demand, again after each loss
pub trait TargetFactory {
    type Target: RenderTarget;

    fn create_target(&mut self, viewport: Viewport) -> Result<Self::Target, ViewerError>;
}
