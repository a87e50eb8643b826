//! Drawing surfaces with pluggable backends.
//!
//! This module provides:
//! - The backend-agnostic `RenderSurface` / `FrameImage` traits
//! - Canvas 2D backend (browser, wasm32 only)
//! - Recording backend (native tests, benches, CLI)

pub mod backend;
pub mod recording;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use backend::{FrameImage, RenderSurface};
pub use recording::{BufferContent, MemoryImage, RecordingSurface, SurfaceOp};

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
