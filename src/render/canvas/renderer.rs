//! Canvas 2D surface.
//!
//! Implements the RenderSurface trait using the HTML Canvas 2D API via web-sys.
//! The canvas fills the window: its CSS size tracks `innerWidth`/`innerHeight`
//! and its backing buffer is scaled by `devicePixelRatio`.

use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, ContextAttributes2d, HtmlCanvasElement, HtmlImageElement,
};

use crate::error::{Result, SequenceError};
use crate::fit::FitRect;
use crate::layout::{ViewportMetrics, ViewportState};
use crate::render::backend::{FrameImage, RenderSurface};

impl FrameImage for HtmlImageElement {
    fn natural_size(&self) -> Option<(f64, f64)> {
        // A broken image reports complete with a zero natural size.
        if !self.complete() || self.natural_width() == 0 || self.natural_height() == 0 {
            return None;
        }
        Some((
            f64::from(self.natural_width()),
            f64::from(self.natural_height()),
        ))
    }
}

/// Canvas 2D surface implementing the RenderSurface trait
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    /// Create a surface on an existing canvas element.
    pub fn new(canvas: HtmlCanvasElement, alpha: bool) -> Result<Self> {
        let attrs = ContextAttributes2d::new();
        attrs.set_alpha(alpha);
        let ctx = canvas
            .get_context_with_context_options("2d", &attrs)
            .map_err(|_| SequenceError::Context("getContext('2d') threw".into()))?
            .ok_or_else(|| SequenceError::Context("no 2d context available".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SequenceError::Context("not a CanvasRenderingContext2d".into()))?;
        ctx.set_image_smoothing_enabled(true);

        Ok(Self { canvas, ctx })
    }

    /// Look up `<canvas id="surface_id">` in the current document.
    pub fn from_element_id(surface_id: &str, alpha: bool) -> Result<Self> {
        let canvas = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id(surface_id))
            .and_then(|element| element.dyn_into::<HtmlCanvasElement>().ok())
            .ok_or_else(|| SequenceError::SurfaceNotFound(surface_id.to_string()))?;
        Self::new(canvas, alpha)
    }

    /// Set the CSS dimensions of the canvas element (logical pixels).
    pub fn set_canvas_css_size(&self, css_w: f64, css_h: f64) {
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{css_w}px"));
        let _ = style.set_property("height", &format!("{css_h}px"));
    }
}

impl RenderSurface for CanvasRenderer {
    type Image = HtmlImageElement;

    fn measure(&self) -> ViewportMetrics {
        let Some(window) = web_sys::window() else {
            return ViewportMetrics::new(0.0, 0.0, 1.0);
        };
        let css_width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let css_height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        ViewportMetrics::new(css_width, css_height, window.device_pixel_ratio())
    }

    fn resize(&mut self, viewport: &ViewportState) {
        // Set canvas buffer size to physical pixels (also clears it)
        self.canvas.set_width(viewport.physical_width);
        self.canvas.set_height(viewport.physical_height);
        self.set_canvas_css_size(viewport.css_width, viewport.css_height);

        // Absolute, not cumulative: repeated resizes never compound the scale.
        let dpr = viewport.dpr;
        let _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
    }

    fn clear(&mut self) {
        self.ctx.save();
        let _ = self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        self.ctx.clear_rect(
            0.0,
            0.0,
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        );
        self.ctx.restore();
    }

    fn draw_image(&mut self, image: &HtmlImageElement, rect: &FitRect) -> Result<()> {
        self.ctx
            .draw_image_with_html_image_element_and_dw_and_dh(
                image,
                rect.offset_x,
                rect.offset_y,
                rect.width,
                rect.height,
            )
            .map_err(|e| SequenceError::Draw(format!("{e:?}")))
    }

    fn release(&mut self) {
        self.canvas.set_width(1);
        self.canvas.set_height(1);
    }
}
