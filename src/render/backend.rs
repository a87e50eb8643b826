//! Surface trait for pluggable drawing targets.
//!
//! A [`RenderSurface`] is the drawing target a player paints frames onto:
//! an HTML canvas in the browser, or an in-memory recorder in tests.

use crate::error::Result;
use crate::fit::FitRect;
use crate::layout::{ViewportMetrics, ViewportState};

/// An image handle owned by a player.
pub trait FrameImage {
    /// Natural pixel size once decoded, `None` while the image cannot be drawn yet.
    fn natural_size(&self) -> Option<(f64, f64)>;
}

/// Trait for drawing surfaces
///
/// Coordinates passed to [`RenderSurface::draw_image`] are CSS pixels; the
/// surface's transform maps them onto the DPR-scaled backing buffer.
pub trait RenderSurface {
    type Image: FrameImage;

    /// Current size of the area the surface fills (the window for full-bleed canvases).
    fn measure(&self) -> ViewportMetrics;

    /// Resize the backing buffer to `viewport.physical_*`, set the CSS size
    /// and reset the transform so one drawing unit equals one CSS pixel.
    ///
    /// Resizing discards the buffer contents.
    fn resize(&mut self, viewport: &ViewportState);

    /// Clear the entire backing buffer regardless of the active transform.
    fn clear(&mut self);

    /// Draw `image` scaled into `rect`.
    fn draw_image(&mut self, image: &Self::Image, rect: &FitRect) -> Result<()>;

    /// Shrink the backing buffer to the minimum to free its memory.
    fn release(&mut self);
}
