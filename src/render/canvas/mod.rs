//! Canvas 2D surface backend.
//!
//! Frames are drawn with the HTML Canvas 2D API via web-sys; image decoding is
//! left to the browser's `<img>` elements.

mod renderer;

pub use renderer::CanvasRenderer;
