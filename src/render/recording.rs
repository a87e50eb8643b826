//! In-memory surface that records draw operations.
//!
//! Used by the native test suite, benchmarks and the CLI planner. The
//! "buffer" is modelled as the last image drawn since the most recent clear.

use crate::error::{Result, SequenceError};
use crate::fit::FitRect;
use crate::layout::{ViewportMetrics, ViewportState};
use crate::render::backend::{FrameImage, RenderSurface};

/// Decoded image stand-in with a known size.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryImage {
    pub id: String,
    pub width: f64,
    pub height: f64,
}

impl MemoryImage {
    pub fn new(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            width,
            height,
        }
    }
}

impl FrameImage for MemoryImage {
    fn natural_size(&self) -> Option<(f64, f64)> {
        (self.width > 0.0 && self.height > 0.0).then_some((self.width, self.height))
    }
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    Resize { width: u32, height: u32, dpr: f64 },
    Clear,
    Draw { image: String, rect: FitRect },
    Release,
}

/// What the backing buffer currently shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum BufferContent {
    #[default]
    Blank,
    Image { id: String, rect: FitRect },
}

/// Surface that keeps a log of operations instead of painting pixels.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    window: ViewportMetrics,
    width: u32,
    height: u32,
    transform_scale: f64,
    content: BufferContent,
    ops: Vec<SurfaceOp>,
    fail_draws: bool,
}

impl RecordingSurface {
    /// A surface hosted in a window of the given CSS size and DPR.
    pub fn new(css_width: f64, css_height: f64, dpr: f64) -> Self {
        Self {
            window: ViewportMetrics::new(css_width, css_height, dpr),
            width: 300,
            height: 150,
            transform_scale: 1.0,
            content: BufferContent::Blank,
            ops: Vec::new(),
            fail_draws: false,
        }
    }

    /// Simulate the host window changing size (takes effect on the next resize).
    pub fn set_window(&mut self, css_width: f64, css_height: f64, dpr: f64) {
        self.window = ViewportMetrics::new(css_width, css_height, dpr);
    }

    /// Make every subsequent draw fail, as a detached canvas would.
    pub fn set_fail_draws(&mut self, fail: bool) {
        self.fail_draws = fail;
    }

    pub fn backing_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn transform_scale(&self) -> f64 {
        self.transform_scale
    }

    pub fn content(&self) -> &BufferContent {
        &self.content
    }

    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    pub fn draw_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, SurfaceOp::Draw { .. }))
            .count()
    }

    pub fn take_ops(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.ops)
    }
}

impl RenderSurface for RecordingSurface {
    type Image = MemoryImage;

    fn measure(&self) -> ViewportMetrics {
        self.window
    }

    fn resize(&mut self, viewport: &ViewportState) {
        self.width = viewport.physical_width;
        self.height = viewport.physical_height;
        // Assigning canvas dimensions resets state and wipes pixels.
        self.transform_scale = viewport.dpr;
        self.content = BufferContent::Blank;
        self.ops.push(SurfaceOp::Resize {
            width: self.width,
            height: self.height,
            dpr: viewport.dpr,
        });
    }

    fn clear(&mut self) {
        self.content = BufferContent::Blank;
        self.ops.push(SurfaceOp::Clear);
    }

    fn draw_image(&mut self, image: &MemoryImage, rect: &FitRect) -> Result<()> {
        if self.fail_draws {
            return Err(SequenceError::Draw(format!("surface rejected {}", image.id)));
        }
        self.content = BufferContent::Image {
            id: image.id.clone(),
            rect: *rect,
        };
        self.ops.push(SurfaceOp::Draw {
            image: image.id.clone(),
            rect: *rect,
        });
        Ok(())
    }

    fn release(&mut self) {
        self.width = 1;
        self.height = 1;
        self.content = BufferContent::Blank;
        self.ops.push(SurfaceOp::Release);
    }
}
